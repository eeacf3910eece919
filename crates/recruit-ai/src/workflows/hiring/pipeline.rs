use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::criteria::JobId;
use super::profile::CandidateId;
use super::repository::{PipelineStore, RepositoryError};
use super::timeline::{entries_for_update, TimelineEntry, TimelineEvent};

/// Recruiter-controlled hiring stage of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineCategory {
    Shortlisted,
    InterviewScheduled,
    Interviewed,
    OfferSent,
    Hired,
    Rejected,
}

impl PipelineCategory {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Shortlisted,
            Self::InterviewScheduled,
            Self::Interviewed,
            Self::OfferSent,
            Self::Hired,
            Self::Rejected,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Shortlisted => "shortlisted",
            Self::InterviewScheduled => "interview_scheduled",
            Self::Interviewed => "interviewed",
            Self::OfferSent => "offer_sent",
            Self::Hired => "hired",
            Self::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Hired | Self::Rejected)
    }

    /// Category assigned straight after evaluation.
    pub const fn initial(auto_rejected: bool) -> Self {
        if auto_rejected {
            Self::Rejected
        } else {
            Self::Shortlisted
        }
    }
}

impl fmt::Display for PipelineCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pipeline position of one candidate for one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineState {
    pub category: PipelineCategory,
    pub is_favorite: bool,
}

impl PipelineState {
    pub fn initial(auto_rejected: bool) -> Self {
        Self {
            category: PipelineCategory::initial(auto_rejected),
            is_favorite: false,
        }
    }

    /// Move to `next`. Re-selecting the current stage is a no-op; `rejected` can never be
    /// chosen and terminal stages never move.
    pub fn transition_to(self, next: PipelineCategory) -> Result<Self, PipelineError> {
        let invalid = PipelineError::InvalidTransition {
            from: self.category,
            to: next,
        };
        if next == PipelineCategory::Rejected {
            return Err(invalid);
        }
        if next == self.category {
            return Ok(self);
        }
        if self.category.is_terminal() {
            return Err(invalid);
        }
        Ok(Self {
            category: next,
            ..self
        })
    }

    pub fn with_favorite(self, is_favorite: bool) -> Self {
        Self {
            is_favorite,
            ..self
        }
    }

    /// State after a ranking refresh. Recruiter decisions survive; a fresh auto-rejection
    /// moves a non-terminal candidate to `rejected`.
    pub(crate) fn after_refresh(current: Option<Self>, auto_rejected: bool) -> Self {
        match current {
            None => Self::initial(auto_rejected),
            Some(state) if auto_rejected && !state.category.is_terminal() => Self {
                category: PipelineCategory::Rejected,
                ..state
            },
            Some(state) => state,
        }
    }

    /// State after an explicit re-evaluation of a single candidate. Only a rejected
    /// candidate is reset from the fresh verdict; other stages, including `hired`, behave
    /// as on a refresh.
    pub(crate) fn after_reevaluation(current: Option<Self>, auto_rejected: bool) -> Self {
        match current {
            Some(state) if state.category == PipelineCategory::Rejected => Self {
                category: PipelineCategory::initial(auto_rejected),
                ..state
            },
            current => Self::after_refresh(current, auto_rejected),
        }
    }
}

/// Addresses one candidate within one job's pipeline.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PipelineKey {
    pub job_id: JobId,
    pub candidate_id: CandidateId,
}

impl PipelineKey {
    pub fn new(job_id: JobId, candidate_id: CandidateId) -> Self {
        Self {
            job_id,
            candidate_id,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("cannot move candidate from {from} to {to}")]
    InvalidTransition {
        from: PipelineCategory,
        to: PipelineCategory,
    },
    #[error("candidate {candidate_id} has no pipeline state for job {job_id}")]
    UnknownCandidate {
        job_id: JobId,
        candidate_id: CandidateId,
    },
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

#[derive(Debug, Default)]
struct PipelineBook {
    states: BTreeMap<PipelineKey, PipelineState>,
    timelines: BTreeMap<PipelineKey, Vec<TimelineEntry>>,
}

/// Process-local pipeline store. Every update runs under a single lock, so the
/// read-check-write of a transition cannot interleave with another and its timeline
/// entries land in commit order.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPipelineStore {
    book: Arc<Mutex<PipelineBook>>,
}

impl InMemoryPipelineStore {
    fn guard(&self) -> Result<MutexGuard<'_, PipelineBook>, RepositoryError> {
        self.book
            .lock()
            .map_err(|_| RepositoryError::Unavailable("pipeline store lock poisoned".into()))
    }
}

impl PipelineStore for InMemoryPipelineStore {
    fn state(&self, key: &PipelineKey) -> Result<Option<PipelineState>, RepositoryError> {
        Ok(self.guard()?.states.get(key).copied())
    }

    fn states(&self, job_id: &JobId) -> Result<BTreeMap<CandidateId, PipelineState>, RepositoryError> {
        Ok(self
            .guard()?
            .states
            .iter()
            .filter(|(key, _)| &key.job_id == job_id)
            .map(|(key, state)| (key.candidate_id.clone(), *state))
            .collect())
    }

    fn modify(
        &self,
        key: &PipelineKey,
        evidence: &[TimelineEvent],
        update: &mut dyn FnMut(Option<PipelineState>) -> Result<PipelineState, PipelineError>,
    ) -> Result<PipelineState, PipelineError> {
        let mut book = self.guard()?;
        let previous = book.states.get(key).copied();
        let next = update(previous)?;
        book.states.insert(key.clone(), next);
        let entries = entries_for_update(Utc::now(), evidence, previous, next);
        book.timelines
            .entry(key.clone())
            .or_default()
            .extend(entries);
        Ok(next)
    }

    fn timeline(&self, key: &PipelineKey) -> Result<Vec<TimelineEntry>, RepositoryError> {
        Ok(self
            .guard()?
            .timelines
            .get(key)
            .map(|entries| entries.iter().rev().cloned().collect())
            .unwrap_or_default())
    }
}
