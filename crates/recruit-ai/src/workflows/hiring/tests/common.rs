use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use axum::Router;
use serde_json::Value;

use crate::workflows::hiring::criteria::{
    JobCriteria, JobId, MilitaryRequirement, SkillPriority, SkillRequirement, TargetCompanies,
};
use crate::workflows::hiring::evaluation::{EvaluationEngine, ScoringConfig};
use crate::workflows::hiring::pipeline::InMemoryPipelineStore;
use crate::workflows::hiring::profile::{
    CandidateId, CandidateProfile, EducationLevel, MilitaryStatus, Reported,
};
use crate::workflows::hiring::repository::{HiringRepository, RankingRun, RepositoryError};
use crate::workflows::hiring::{ranking_router, RankingService};

pub(super) type TestService = RankingService<MemoryRepository, InMemoryPipelineStore>;

pub(super) fn job_id() -> JobId {
    JobId("job-backend".to_string())
}

pub(super) fn candidate_id(id: &str) -> CandidateId {
    CandidateId(id.to_string())
}

/// Backend role: three years minimum (auto-reject), bachelor preferred, soft military check.
pub(super) fn backend_criteria() -> JobCriteria {
    JobCriteria {
        required_skills: vec![
            SkillRequirement::new("Rust", SkillPriority::Critical),
            SkillRequirement::new("PostgreSQL", SkillPriority::Important),
            SkillRequirement::new("Docker", SkillPriority::NiceToHave),
        ],
        experience_min_years: Some(3),
        experience_min_years_auto_reject: true,
        military_status: Some(MilitaryRequirement::CompletedOrFullExempt),
        military_auto_reject: false,
        education_level: Some(EducationLevel::Bachelor),
        education_level_auto_reject: false,
        target_companies: TargetCompanies {
            enabled: true,
            companies: vec!["Acme Corp".to_string()],
        },
        ..JobCriteria::default()
    }
}

pub(super) fn profile(id: &str, name: &str, years: f64) -> CandidateProfile {
    let mut profile = CandidateProfile::new(id, name);
    profile.experience_years = Some(years);
    profile
}

pub(super) fn amy() -> CandidateProfile {
    let mut amy = profile("c-amy", "Amy", 6.0);
    amy.education_level = Some(Reported::Known(EducationLevel::Master));
    amy.military_status = Some(Reported::Known(MilitaryStatus::Completed));
    amy.skills = vec!["rust".into(), "postgresql".into()];
    amy.companies = vec!["Acme Corp".into()];
    amy
}

pub(super) fn ben() -> CandidateProfile {
    let mut ben = profile("c-ben", "Ben", 4.0);
    ben.education_level = Some(Reported::Known(EducationLevel::Bachelor));
    ben.military_status = Some(Reported::Known(MilitaryStatus::NotServed));
    ben.skills = vec!["Docker".into()];
    ben
}

/// Falls short of the minimum tenure, so the experience rule rejects him.
pub(super) fn carl() -> CandidateProfile {
    let mut carl = profile("c-carl", "Carl", 1.5);
    carl.education_level = Some(Reported::Known(EducationLevel::Doctorate));
    carl
}

pub(super) fn roster() -> Vec<CandidateProfile> {
    vec![carl(), ben(), amy()]
}

pub(super) fn engine() -> EvaluationEngine {
    EvaluationEngine::new(ScoringConfig::default()).expect("default scoring is valid")
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    criteria: Mutex<BTreeMap<JobId, JobCriteria>>,
    candidates: Mutex<BTreeMap<JobId, Vec<CandidateProfile>>>,
    runs: Mutex<BTreeMap<JobId, RankingRun>>,
}

impl MemoryRepository {
    pub(super) fn with_job(job_id: JobId, criteria: JobCriteria, candidates: Vec<CandidateProfile>) -> Self {
        let repository = Self::default();
        repository.set_criteria(job_id.clone(), criteria);
        repository.set_candidates(job_id, candidates);
        repository
    }

    pub(super) fn set_criteria(&self, job_id: JobId, criteria: JobCriteria) {
        self.criteria
            .lock()
            .expect("criteria mutex poisoned")
            .insert(job_id, criteria);
    }

    pub(super) fn set_candidates(&self, job_id: JobId, candidates: Vec<CandidateProfile>) {
        self.candidates
            .lock()
            .expect("candidate mutex poisoned")
            .insert(job_id, candidates);
    }
}

impl HiringRepository for MemoryRepository {
    fn criteria(&self, job_id: &JobId) -> Result<Option<JobCriteria>, RepositoryError> {
        Ok(self
            .criteria
            .lock()
            .expect("criteria mutex poisoned")
            .get(job_id)
            .cloned())
    }

    fn candidates(&self, job_id: &JobId) -> Result<Vec<CandidateProfile>, RepositoryError> {
        Ok(self
            .candidates
            .lock()
            .expect("candidate mutex poisoned")
            .get(job_id)
            .cloned()
            .unwrap_or_default())
    }

    fn replace_run(&self, run: RankingRun) -> Result<(), RepositoryError> {
        self.runs
            .lock()
            .expect("run mutex poisoned")
            .insert(run.job_id.clone(), run);
        Ok(())
    }

    fn latest_run(&self, job_id: &JobId) -> Result<Option<RankingRun>, RepositoryError> {
        Ok(self
            .runs
            .lock()
            .expect("run mutex poisoned")
            .get(job_id)
            .cloned())
    }
}

pub(super) struct UnavailableRepository;

impl HiringRepository for UnavailableRepository {
    fn criteria(&self, _job_id: &JobId) -> Result<Option<JobCriteria>, RepositoryError> {
        Err(RepositoryError::Unavailable("criteria store offline".into()))
    }

    fn candidates(&self, _job_id: &JobId) -> Result<Vec<CandidateProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("profile store offline".into()))
    }

    fn replace_run(&self, _run: RankingRun) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("run store offline".into()))
    }

    fn latest_run(&self, _job_id: &JobId) -> Result<Option<RankingRun>, RepositoryError> {
        Err(RepositoryError::Unavailable("run store offline".into()))
    }
}

pub(super) fn build_service() -> (
    Arc<TestService>,
    Arc<MemoryRepository>,
    Arc<InMemoryPipelineStore>,
) {
    let repository = Arc::new(MemoryRepository::with_job(
        job_id(),
        backend_criteria(),
        roster(),
    ));
    let pipeline = Arc::new(InMemoryPipelineStore::default());
    let service = Arc::new(
        RankingService::new(repository.clone(), pipeline.clone(), ScoringConfig::default())
            .expect("default scoring is valid"),
    );
    (service, repository, pipeline)
}

pub(super) fn router_with_service(service: Arc<TestService>) -> Router {
    ranking_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
