use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::criteria::{JobCriteria, JobId};
use super::pipeline::{PipelineCategory, PipelineError, PipelineKey, PipelineState};
use super::profile::{CandidateId, CandidateProfile};
use super::ranking::EvaluationResult;
use super::timeline::{TimelineEntry, TimelineEvent};

/// Output of one ranking refresh. A new run replaces the job's previous run wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRun {
    pub job_id: JobId,
    pub scored_at: DateTime<Utc>,
    pub results: Vec<EvaluationResult>,
}

impl RankingRun {
    pub fn result_for(&self, candidate_id: &CandidateId) -> Option<&EvaluationResult> {
        self.results
            .iter()
            .find(|result| &result.candidate_id == candidate_id)
    }

    /// Flatten the run into persisted rows, joined with current pipeline state. Candidates
    /// without stored state report the category evaluation would assign them.
    pub fn rows(&self, states: &BTreeMap<CandidateId, PipelineState>) -> Vec<RankingRow> {
        self.results
            .iter()
            .map(|result| {
                let state = states
                    .get(&result.candidate_id)
                    .copied()
                    .unwrap_or_else(|| PipelineState::initial(result.auto_rejected()));
                let scores = result.scores();
                RankingRow {
                    candidate_id: result.candidate_id.clone(),
                    candidate_name: result.candidate_name.clone(),
                    job_id: result.job_id.clone(),
                    overall_score: scores.map(|scores| scores.overall),
                    experience_score: scores.map(|scores| scores.experience),
                    education_score: scores.map(|scores| scores.education),
                    rank: result.rank(),
                    auto_rejected: result.auto_rejected(),
                    rejection_reason: result.rejection_reason().map(str::to_string),
                    category: state.category,
                    is_favorite: state.is_favorite,
                    scored_at: self.scored_at,
                }
            })
            .collect()
    }
}

/// Flat per-candidate shape exposed to callers and persisted by storage adapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRow {
    pub candidate_id: CandidateId,
    pub candidate_name: String,
    pub job_id: JobId,
    pub overall_score: Option<f64>,
    pub experience_score: Option<f64>,
    pub education_score: Option<f64>,
    pub rank: Option<u32>,
    pub auto_rejected: bool,
    pub rejection_reason: Option<String>,
    pub category: PipelineCategory,
    pub is_favorite: bool,
    pub scored_at: DateTime<Utc>,
}

/// Storage abstraction for criteria, profiles and ranking runs so the service can be
/// exercised in isolation.
pub trait HiringRepository: Send + Sync {
    fn criteria(&self, job_id: &JobId) -> Result<Option<JobCriteria>, RepositoryError>;
    fn candidates(&self, job_id: &JobId) -> Result<Vec<CandidateProfile>, RepositoryError>;
    fn replace_run(&self, run: RankingRun) -> Result<(), RepositoryError>;
    fn latest_run(&self, job_id: &JobId) -> Result<Option<RankingRun>, RepositoryError>;
}

/// Pipeline state storage shared with the recruiting UI.
pub trait PipelineStore: Send + Sync {
    fn state(&self, key: &PipelineKey) -> Result<Option<PipelineState>, RepositoryError>;
    fn states(&self, job_id: &JobId) -> Result<BTreeMap<CandidateId, PipelineState>, RepositoryError>;

    /// Atomic check-and-set: `update` sees the current state and returns the next one.
    /// A committed update appends `evidence` and the resulting status and favorite changes
    /// to the candidate's timeline. When `update` fails nothing is written.
    fn modify(
        &self,
        key: &PipelineKey,
        evidence: &[TimelineEvent],
        update: &mut dyn FnMut(Option<PipelineState>) -> Result<PipelineState, PipelineError>,
    ) -> Result<PipelineState, PipelineError>;

    /// Timeline entries for one candidate, newest first.
    fn timeline(&self, key: &PipelineKey) -> Result<Vec<TimelineEntry>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
