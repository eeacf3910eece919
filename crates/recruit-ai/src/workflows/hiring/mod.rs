//! Candidate evaluation and ranking for a single job.
//!
//! Criteria and profiles flow through the rule evaluator, survivors are scored and ranked,
//! and the pipeline state machine tracks each candidate's hiring stage afterwards.

pub mod criteria;
pub mod evaluation;
pub(crate) mod normalizer;
pub mod pipeline;
pub mod profile;
pub mod ranking;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;
pub mod timeline;

#[cfg(test)]
mod tests;

pub use criteria::{
    AgeRange, JobCriteria, JobId, MilitaryRequirement, PreferredUniversities, SkillPriority,
    SkillRequirement, TargetCompanies, ValidationError,
};
pub use evaluation::{
    AssessmentStatus, CandidateAssessment, EducationScale, EvaluationEngine, Rejection,
    RuleEvaluation, RuleFailure, RuleKind, RuleVerdict, ScoreBreakdown, ScoringConfig,
    ScoringWeights, SkillBonus, Verdict,
};
pub use pipeline::{
    InMemoryPipelineStore, PipelineCategory, PipelineError, PipelineKey, PipelineState,
};
pub use profile::{
    CandidateId, CandidateProfile, EducationLevel, Gender, MilitaryStatus, Reported,
    UnknownLabel,
};
pub use ranking::{Disposition, EvaluationResult};
pub use report::RankingSummary;
pub use repository::{HiringRepository, PipelineStore, RankingRow, RankingRun, RepositoryError};
pub use router::ranking_router;
pub use service::{RankingService, RankingServiceError, RefreshSummary};
pub use timeline::{TimelineEntry, TimelineEvent};
