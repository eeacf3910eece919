use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::evaluation::RuleKind;
use super::pipeline::{PipelineCategory, PipelineState};
use super::ranking::{Disposition, EvaluationResult};

/// Something that happened to a candidate within one job's pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum TimelineEvent {
    Scored {
        overall: f64,
        experience: f64,
        education: f64,
    },
    Ranked {
        rank: u32,
    },
    AutoRejected {
        rule: RuleKind,
        reason: String,
    },
    Reevaluated,
    StatusChanged {
        from: Option<PipelineCategory>,
        to: PipelineCategory,
    },
    FavoriteChanged {
        is_favorite: bool,
    },
}

impl TimelineEvent {
    /// What a ranking run says about one candidate.
    pub fn from_result(result: &EvaluationResult) -> Vec<Self> {
        match &result.disposition {
            Disposition::Ranked { rank, scores } => vec![
                Self::Scored {
                    overall: scores.overall,
                    experience: scores.experience,
                    education: scores.education,
                },
                Self::Ranked { rank: *rank },
            ],
            Disposition::AutoRejected {
                rejected_by,
                reason,
            } => vec![Self::AutoRejected {
                rule: *rejected_by,
                reason: reason.clone(),
            }],
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Scored { overall, .. } => format!("Scored {overall:.2} overall"),
            Self::Ranked { rank } => format!("Ranked #{rank}"),
            Self::AutoRejected { rule, reason } => format!("Auto-rejected by {rule}: {reason}"),
            Self::Reevaluated => "Re-evaluated against current criteria".to_string(),
            Self::StatusChanged { from: None, to } => format!("Entered pipeline as {to}"),
            Self::StatusChanged {
                from: Some(from),
                to,
            } => format!("Moved from {from} to {to}"),
            Self::FavoriteChanged { is_favorite: true } => "Marked as favorite".to_string(),
            Self::FavoriteChanged { is_favorite: false } => "Removed from favorites".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub at: DateTime<Utc>,
    pub description: String,
    #[serde(flatten)]
    pub event: TimelineEvent,
}

/// Entries for one committed update: the caller's evidence followed by the category and
/// favorite changes between `previous` and `next`.
pub(crate) fn entries_for_update(
    at: DateTime<Utc>,
    evidence: &[TimelineEvent],
    previous: Option<PipelineState>,
    next: PipelineState,
) -> Vec<TimelineEntry> {
    let mut events = evidence.to_vec();
    let previous_category = previous.map(|state| state.category);
    if previous_category != Some(next.category) {
        events.push(TimelineEvent::StatusChanged {
            from: previous_category,
            to: next.category,
        });
    }
    if let Some(previous) = previous {
        if previous.is_favorite != next.is_favorite {
            events.push(TimelineEvent::FavoriteChanged {
                is_favorite: next.is_favorite,
            });
        }
    }

    events
        .into_iter()
        .map(|event| TimelineEntry {
            at,
            description: event.describe(),
            event,
        })
        .collect()
}
