mod config;
mod policy;
mod rules;
mod scoring;

pub use config::{EducationScale, ScoringConfig, ScoringWeights, SkillBonus};
pub use policy::RuleFailure;
pub use scoring::ScoreBreakdown;

pub(crate) use scoring::round2;

use std::collections::BTreeSet;
use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::criteria::{JobCriteria, JobId, ValidationError};
use super::profile::{CandidateId, CandidateProfile};
use super::ranking::{self, EvaluationResult};

/// Filtering rules in the order they are checked. The first auto-rejecting failure in this
/// order supplies the rejection reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Experience,
    Age,
    Gender,
    Military,
    EducationLevel,
    EducationMajor,
    PreferredUniversities,
    TargetCompanies,
}

impl RuleKind {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::Experience,
            Self::Age,
            Self::Gender,
            Self::Military,
            Self::EducationLevel,
            Self::EducationMajor,
            Self::PreferredUniversities,
            Self::TargetCompanies,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Experience => "experience",
            Self::Age => "age",
            Self::Gender => "gender",
            Self::Military => "military",
            Self::EducationLevel => "education_level",
            Self::EducationMajor => "education_major",
            Self::PreferredUniversities => "preferred_universities",
            Self::TargetCompanies => "target_companies",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail(RuleFailure),
    NotApplicable,
}

/// Outcome of one rule for one candidate, kept for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleVerdict {
    pub rule: RuleKind,
    pub outcome: Verdict,
    /// Whether the criterion asked for auto-rejection on failure.
    pub auto_reject: bool,
    pub detail: String,
}

impl RuleVerdict {
    pub(crate) fn passed(rule: RuleKind, auto_reject: bool, detail: impl Into<String>) -> Self {
        Self {
            rule,
            outcome: Verdict::Pass,
            auto_reject,
            detail: detail.into(),
        }
    }

    pub(crate) fn failed(rule: RuleKind, auto_reject: bool, failure: RuleFailure) -> Self {
        Self {
            rule,
            detail: failure.summary(),
            outcome: Verdict::Fail(failure),
            auto_reject,
        }
    }

    pub(crate) fn not_applicable(rule: RuleKind, auto_reject: bool, detail: impl Into<String>) -> Self {
        Self {
            rule,
            outcome: Verdict::NotApplicable,
            auto_reject,
            detail: detail.into(),
        }
    }

    pub fn failure(&self) -> Option<&RuleFailure> {
        match &self.outcome {
            Verdict::Fail(failure) => Some(failure),
            Verdict::Pass | Verdict::NotApplicable => None,
        }
    }

    /// Failed on a criterion flagged for auto-rejection.
    pub fn disqualifies(&self) -> bool {
        self.auto_reject && self.failure().is_some()
    }
}

/// The rule that removed a candidate from ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    pub rule: RuleKind,
    pub failure: RuleFailure,
}

impl Rejection {
    pub fn reason(&self) -> String {
        self.failure.summary()
    }
}

/// Verdicts for every rule plus the auto-reject decision they imply.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEvaluation {
    pub verdicts: Vec<RuleVerdict>,
    pub rejection: Option<Rejection>,
}

/// Per-candidate result before ranks are assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateAssessment {
    pub candidate_id: CandidateId,
    pub candidate_name: String,
    pub verdicts: Vec<RuleVerdict>,
    pub status: AssessmentStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssessmentStatus {
    Scored(ScoreBreakdown),
    AutoRejected(Rejection),
}

/// Stateless evaluator applying the scoring configuration to candidate batches.
#[derive(Debug, Clone)]
pub struct EvaluationEngine {
    config: ScoringConfig,
}

impl EvaluationEngine {
    pub fn new(config: ScoringConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn evaluate(&self, criteria: &JobCriteria, profile: &CandidateProfile) -> RuleEvaluation {
        let verdicts = rules::evaluate_rules(criteria, profile);
        let rejection = policy::first_disqualifier(&verdicts).map(|(rule, failure)| Rejection {
            rule,
            failure: failure.clone(),
        });
        RuleEvaluation {
            verdicts,
            rejection,
        }
    }

    /// Score a candidate regardless of whether a rule would reject them.
    pub fn score(&self, criteria: &JobCriteria, profile: &CandidateProfile) -> ScoreBreakdown {
        let verdicts = rules::evaluate_rules(criteria, profile);
        scoring::score_profile(criteria, profile, &verdicts, &self.config)
    }

    pub fn assess(&self, criteria: &JobCriteria, profile: &CandidateProfile) -> CandidateAssessment {
        let RuleEvaluation {
            verdicts,
            rejection,
        } = self.evaluate(criteria, profile);

        let status = match rejection {
            Some(rejection) => AssessmentStatus::AutoRejected(rejection),
            None => AssessmentStatus::Scored(scoring::score_profile(
                criteria,
                profile,
                &verdicts,
                &self.config,
            )),
        };

        CandidateAssessment {
            candidate_id: profile.id.clone(),
            candidate_name: profile.name.clone(),
            verdicts,
            status,
        }
    }

    /// Evaluate a whole batch for one job: ranked candidates first by rank, then the
    /// auto-rejected ones. Malformed criteria or duplicate candidate ids refuse the batch.
    pub fn run(
        &self,
        job_id: &JobId,
        criteria: &JobCriteria,
        profiles: &[CandidateProfile],
    ) -> Result<Vec<EvaluationResult>, ValidationError> {
        criteria.validate()?;
        ensure_unique_candidates(profiles)?;

        let assessments: Vec<CandidateAssessment> = profiles
            .par_iter()
            .map(|profile| self.assess(criteria, profile))
            .collect();

        let results = ranking::rank(job_id, assessments);
        debug!(
            job_id = %job_id,
            candidates = results.len(),
            rejected = results.iter().filter(|result| result.auto_rejected()).count(),
            "evaluated candidate batch"
        );
        Ok(results)
    }
}

fn ensure_unique_candidates(profiles: &[CandidateProfile]) -> Result<(), ValidationError> {
    let mut seen = BTreeSet::new();
    for profile in profiles {
        if !seen.insert(&profile.id) {
            return Err(ValidationError::DuplicateCandidate(profile.id.clone()));
        }
    }
    Ok(())
}
