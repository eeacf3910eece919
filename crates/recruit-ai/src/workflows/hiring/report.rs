use chrono::{DateTime, Utc};
use serde::Serialize;

use super::criteria::JobId;
use super::evaluation::round2;
use super::repository::RankingRow;

const TOP_CANDIDATE_LIMIT: usize = 10;

/// Review dashboard for one job's latest ranking run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingSummary {
    pub job_id: JobId,
    pub scored_at: DateTime<Utc>,
    pub total_candidates: usize,
    pub auto_rejected: usize,
    /// Mean overall score of ranked candidates; zero when nobody survived.
    pub average_score: f64,
    pub top_candidates: Vec<RankingRow>,
    pub rejected_candidates: Vec<RankingRow>,
}

impl RankingSummary {
    pub fn from_rows(job_id: JobId, scored_at: DateTime<Utc>, rows: Vec<RankingRow>) -> Self {
        let total_candidates = rows.len();
        let (mut ranked, rejected): (Vec<_>, Vec<_>) =
            rows.into_iter().partition(|row| !row.auto_rejected);
        ranked.sort_by_key(|row| row.rank);

        let scores: Vec<f64> = ranked.iter().filter_map(|row| row.overall_score).collect();
        let average_score = if scores.is_empty() {
            0.0
        } else {
            round2(scores.iter().sum::<f64>() / scores.len() as f64)
        };

        ranked.truncate(TOP_CANDIDATE_LIMIT);

        Self {
            job_id,
            scored_at,
            total_candidates,
            auto_rejected: rejected.len(),
            average_score,
            top_candidates: ranked,
            rejected_candidates: rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::hiring::pipeline::PipelineCategory;
    use crate::workflows::hiring::profile::CandidateId;

    fn row(id: &str, rank: Option<u32>, overall: Option<f64>) -> RankingRow {
        RankingRow {
            candidate_id: CandidateId(id.to_string()),
            candidate_name: id.to_uppercase(),
            job_id: JobId("job-1".into()),
            overall_score: overall,
            experience_score: overall,
            education_score: overall,
            rank,
            auto_rejected: rank.is_none(),
            rejection_reason: rank.is_none().then(|| "Insufficient experience".to_string()),
            category: if rank.is_none() {
                PipelineCategory::Rejected
            } else {
                PipelineCategory::Shortlisted
            },
            is_favorite: false,
            scored_at: Utc::now(),
        }
    }

    #[test]
    fn summary_averages_ranked_scores_only() {
        let rows = vec![
            row("a", Some(1), Some(90.0)),
            row("b", Some(2), Some(70.0)),
            row("c", Some(3), Some(65.5)),
            row("d", None, None),
        ];
        let summary = RankingSummary::from_rows(JobId("job-1".into()), Utc::now(), rows);

        assert_eq!(summary.total_candidates, 4);
        assert_eq!(summary.auto_rejected, 1);
        assert_eq!(summary.average_score, 75.17);
        assert_eq!(summary.top_candidates.len(), 3);
        assert_eq!(summary.rejected_candidates[0].candidate_id.0, "d");
    }

    #[test]
    fn summary_caps_top_candidates() {
        let rows = (1..=12)
            .map(|rank| row(&format!("c{rank}"), Some(rank), Some(50.0)))
            .collect();
        let summary = RankingSummary::from_rows(JobId("job-1".into()), Utc::now(), rows);

        assert_eq!(summary.top_candidates.len(), 10);
        assert_eq!(summary.top_candidates[0].rank, Some(1));
        assert_eq!(summary.average_score, 50.0);
    }

    #[test]
    fn empty_run_reports_zero_average() {
        let summary = RankingSummary::from_rows(JobId("job-1".into()), Utc::now(), Vec::new());
        assert_eq!(summary.average_score, 0.0);
        assert!(summary.top_candidates.is_empty());
    }
}
