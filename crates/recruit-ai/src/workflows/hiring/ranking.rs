use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::criteria::JobId;
use super::evaluation::{
    AssessmentStatus, CandidateAssessment, RuleKind, RuleVerdict, ScoreBreakdown,
};
use super::profile::CandidateId;

/// Final evaluation of one candidate for one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub candidate_id: CandidateId,
    pub job_id: JobId,
    pub candidate_name: String,
    pub disposition: Disposition,
    pub verdicts: Vec<RuleVerdict>,
}

/// A candidate is either ranked with scores or auto-rejected with a reason, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Disposition {
    Ranked {
        rank: u32,
        scores: ScoreBreakdown,
    },
    AutoRejected {
        rejected_by: RuleKind,
        reason: String,
    },
}

impl EvaluationResult {
    pub fn auto_rejected(&self) -> bool {
        matches!(self.disposition, Disposition::AutoRejected { .. })
    }

    pub fn rank(&self) -> Option<u32> {
        match self.disposition {
            Disposition::Ranked { rank, .. } => Some(rank),
            Disposition::AutoRejected { .. } => None,
        }
    }

    pub fn scores(&self) -> Option<&ScoreBreakdown> {
        match &self.disposition {
            Disposition::Ranked { scores, .. } => Some(scores),
            Disposition::AutoRejected { .. } => None,
        }
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        match &self.disposition {
            Disposition::Ranked { .. } => None,
            Disposition::AutoRejected { reason, .. } => Some(reason),
        }
    }
}

/// Order surviving candidates and assign dense 1-based ranks, then append auto-rejected
/// candidates ordered by name and id.
pub(crate) fn rank(job_id: &JobId, assessments: Vec<CandidateAssessment>) -> Vec<EvaluationResult> {
    let mut scored = Vec::new();
    let mut rejected = Vec::new();

    for assessment in assessments {
        let CandidateAssessment {
            candidate_id,
            candidate_name,
            verdicts,
            status,
        } = assessment;
        match status {
            AssessmentStatus::Scored(scores) => {
                scored.push((candidate_id, candidate_name, verdicts, scores));
            }
            AssessmentStatus::AutoRejected(rejection) => rejected.push(EvaluationResult {
                candidate_id,
                job_id: job_id.clone(),
                candidate_name,
                disposition: Disposition::AutoRejected {
                    rejected_by: rejection.rule,
                    reason: rejection.reason(),
                },
                verdicts,
            }),
        }
    }

    scored.sort_by(|left, right| {
        compare_scored(
            (&left.3, &left.1, &left.0),
            (&right.3, &right.1, &right.0),
        )
    });
    rejected.sort_by(|left, right| {
        left.candidate_name
            .cmp(&right.candidate_name)
            .then_with(|| left.candidate_id.cmp(&right.candidate_id))
    });

    let mut results: Vec<EvaluationResult> = scored
        .into_iter()
        .zip(1u32..)
        .map(
            |((candidate_id, candidate_name, verdicts, scores), rank)| EvaluationResult {
                candidate_id,
                job_id: job_id.clone(),
                candidate_name,
                disposition: Disposition::Ranked { rank, scores },
                verdicts,
            },
        )
        .collect();
    results.extend(rejected);
    results
}

/// Overall, then experience, then education (all descending), then name and id ascending.
fn compare_scored(
    left: (&ScoreBreakdown, &String, &CandidateId),
    right: (&ScoreBreakdown, &String, &CandidateId),
) -> Ordering {
    let (left_scores, left_name, left_id) = left;
    let (right_scores, right_name, right_id) = right;
    right_scores
        .overall
        .total_cmp(&left_scores.overall)
        .then_with(|| right_scores.experience.total_cmp(&left_scores.experience))
        .then_with(|| right_scores.education.total_cmp(&left_scores.education))
        .then_with(|| left_name.cmp(right_name))
        .then_with(|| left_id.cmp(right_id))
}
