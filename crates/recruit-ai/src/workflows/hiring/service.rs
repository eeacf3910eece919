use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::criteria::{JobId, ValidationError};
use super::evaluation::{EvaluationEngine, ScoringConfig};
use super::pipeline::{PipelineCategory, PipelineError, PipelineKey, PipelineState};
use super::profile::CandidateId;
use super::report::RankingSummary;
use super::repository::{HiringRepository, PipelineStore, RankingRow, RankingRun, RepositoryError};
use super::timeline::{TimelineEntry, TimelineEvent};

/// Orchestrates ranking refreshes and pipeline transitions over the storage seams.
pub struct RankingService<R, P> {
    repository: Arc<R>,
    pipeline: Arc<P>,
    engine: Arc<EvaluationEngine>,
}

/// Outcome of a ranking refresh, returned to the caller that triggered it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshSummary {
    pub job_id: JobId,
    pub scored_at: DateTime<Utc>,
    pub total_candidates: usize,
    pub ranked_candidates: usize,
    pub auto_rejected: usize,
}

impl<R, P> RankingService<R, P>
where
    R: HiringRepository + 'static,
    P: PipelineStore + 'static,
{
    pub fn new(
        repository: Arc<R>,
        pipeline: Arc<P>,
        config: ScoringConfig,
    ) -> Result<Self, ValidationError> {
        let engine = Arc::new(EvaluationEngine::new(config)?);
        Ok(Self {
            repository,
            pipeline,
            engine,
        })
    }

    pub fn engine(&self) -> Arc<EvaluationEngine> {
        Arc::clone(&self.engine)
    }

    /// Re-run the whole job and replace its previous ranking.
    pub fn refresh(&self, job_id: &JobId) -> Result<RefreshSummary, RankingServiceError> {
        let run = self.execute(job_id)?;
        let auto_rejected = run
            .results
            .iter()
            .filter(|result| result.auto_rejected())
            .count();
        let summary = RefreshSummary {
            job_id: run.job_id.clone(),
            scored_at: run.scored_at,
            total_candidates: run.results.len(),
            ranked_candidates: run.results.len() - auto_rejected,
            auto_rejected,
        };

        info!(
            job_id = %summary.job_id,
            candidates = summary.total_candidates,
            ranked = summary.ranked_candidates,
            auto_rejected = summary.auto_rejected,
            "ranking refreshed"
        );
        Ok(summary)
    }

    /// Latest ranking joined with current pipeline state.
    pub fn ranking(&self, job_id: &JobId) -> Result<Vec<RankingRow>, RankingServiceError> {
        let run = self.latest(job_id)?;
        let states = self.pipeline.states(job_id)?;
        Ok(run.rows(&states))
    }

    pub fn summary(&self, job_id: &JobId) -> Result<RankingSummary, RankingServiceError> {
        let run = self.latest(job_id)?;
        let states = self.pipeline.states(job_id)?;
        let rows = run.rows(&states);
        Ok(RankingSummary::from_rows(run.job_id, run.scored_at, rows))
    }

    pub fn set_category(
        &self,
        job_id: &JobId,
        candidate_id: &CandidateId,
        category: PipelineCategory,
    ) -> Result<PipelineState, RankingServiceError> {
        let key = PipelineKey::new(job_id.clone(), candidate_id.clone());
        let mut previous = None;
        let result = self.pipeline.modify(&key, &[], &mut |current| {
            let state = current.ok_or_else(|| unknown_candidate(&key))?;
            previous = Some(state.category);
            state.transition_to(category)
        });

        match result {
            Ok(state) => {
                info!(
                    job_id = %job_id,
                    candidate_id = %candidate_id,
                    from = ?previous,
                    to = %state.category,
                    "pipeline category updated"
                );
                Ok(state)
            }
            Err(err) => {
                warn!(
                    job_id = %job_id,
                    candidate_id = %candidate_id,
                    requested = %category,
                    error = %err,
                    "pipeline transition refused"
                );
                Err(err.into())
            }
        }
    }

    /// Favorites are annotations and may be toggled in any category.
    pub fn set_favorite(
        &self,
        job_id: &JobId,
        candidate_id: &CandidateId,
        is_favorite: bool,
    ) -> Result<PipelineState, RankingServiceError> {
        let key = PipelineKey::new(job_id.clone(), candidate_id.clone());
        let state = self.pipeline.modify(&key, &[], &mut |current| {
            current
                .map(|state| state.with_favorite(is_favorite))
                .ok_or_else(|| unknown_candidate(&key))
        })?;
        Ok(state)
    }

    /// Explicit re-evaluation: re-rank the job, then reset a rejected candidate's category
    /// from the fresh verdict. This is the only path out of `rejected`; recruiter progress
    /// and `hired` are kept unless the fresh verdict rejects a non-terminal candidate.
    pub fn reevaluate(
        &self,
        job_id: &JobId,
        candidate_id: &CandidateId,
    ) -> Result<PipelineState, RankingServiceError> {
        let key = PipelineKey::new(job_id.clone(), candidate_id.clone());
        let run = self.execute(job_id)?;
        let auto_rejected = run
            .result_for(candidate_id)
            .map(|result| result.auto_rejected())
            .ok_or_else(|| unknown_candidate(&key))?;

        let state = self
            .pipeline
            .modify(&key, &[TimelineEvent::Reevaluated], &mut |current| {
                Ok(PipelineState::after_reevaluation(current, auto_rejected))
            })?;

        info!(
            job_id = %job_id,
            candidate_id = %candidate_id,
            category = %state.category,
            "candidate re-evaluated"
        );
        Ok(state)
    }

    /// History of one candidate within the job, newest first.
    pub fn timeline(
        &self,
        job_id: &JobId,
        candidate_id: &CandidateId,
    ) -> Result<Vec<TimelineEntry>, RankingServiceError> {
        let key = PipelineKey::new(job_id.clone(), candidate_id.clone());
        if self.pipeline.state(&key)?.is_none() {
            return Err(unknown_candidate(&key).into());
        }
        Ok(self.pipeline.timeline(&key)?)
    }

    fn execute(&self, job_id: &JobId) -> Result<RankingRun, RankingServiceError> {
        let criteria = self
            .repository
            .criteria(job_id)?
            .ok_or_else(|| RankingServiceError::UnknownJob(job_id.clone()))?;
        let profiles = self.repository.candidates(job_id)?;
        if profiles.is_empty() {
            return Err(RankingServiceError::NoCandidates(job_id.clone()));
        }

        let results = self.engine.run(job_id, &criteria, &profiles)?;
        let run = RankingRun {
            job_id: job_id.clone(),
            scored_at: Utc::now(),
            results,
        };
        self.repository.replace_run(run.clone())?;

        for result in &run.results {
            let key = PipelineKey::new(job_id.clone(), result.candidate_id.clone());
            let auto_rejected = result.auto_rejected();
            let evidence = TimelineEvent::from_result(result);
            self.pipeline.modify(&key, &evidence, &mut |current| {
                Ok(PipelineState::after_refresh(current, auto_rejected))
            })?;
        }

        Ok(run)
    }

    fn latest(&self, job_id: &JobId) -> Result<RankingRun, RankingServiceError> {
        self.repository
            .latest_run(job_id)?
            .ok_or_else(|| RankingServiceError::NotRanked(job_id.clone()))
    }
}

fn unknown_candidate(key: &PipelineKey) -> PipelineError {
    PipelineError::UnknownCandidate {
        job_id: key.job_id.clone(),
        candidate_id: key.candidate_id.clone(),
    }
}

/// Error raised by the ranking service.
#[derive(Debug, thiserror::Error)]
pub enum RankingServiceError {
    #[error("job {0} was not found")]
    UnknownJob(JobId),
    #[error("job {0} has no candidates to rank")]
    NoCandidates(JobId),
    #[error("job {0} has not been ranked yet")]
    NotRanked(JobId),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
