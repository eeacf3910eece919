use metrics_exporter_prometheus::PrometheusHandle;
use recruit_ai::error::AppError;
use recruit_ai::workflows::hiring::{
    CandidateProfile, HiringRepository, JobCriteria, JobId, RankingRun, RepositoryError,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// One job with its criteria and candidate pool, as found in seed and batch files.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct JobBatch {
    pub(crate) job_id: JobId,
    pub(crate) criteria: JobCriteria,
    #[serde(default)]
    pub(crate) candidates: Vec<CandidateProfile>,
}

pub(crate) fn load_batches(path: &Path) -> Result<Vec<JobBatch>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let batches = serde_json::from_str(&raw)?;
    Ok(batches)
}

#[derive(Debug, Default)]
struct JobRecord {
    criteria: Option<JobCriteria>,
    candidates: Vec<CandidateProfile>,
    latest_run: Option<RankingRun>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryHiringRepository {
    jobs: Arc<Mutex<BTreeMap<JobId, JobRecord>>>,
}

impl InMemoryHiringRepository {
    pub(crate) fn seeded(batches: Vec<JobBatch>) -> Result<Self, RepositoryError> {
        let repository = Self::default();
        for batch in batches {
            repository.upsert_job(batch)?;
        }
        Ok(repository)
    }

    pub(crate) fn upsert_job(&self, batch: JobBatch) -> Result<(), RepositoryError> {
        let mut jobs = self.lock()?;
        let record = jobs.entry(batch.job_id).or_default();
        record.criteria = Some(batch.criteria);
        record.candidates = batch.candidates;
        Ok(())
    }

    pub(crate) fn job_count(&self) -> Result<usize, RepositoryError> {
        Ok(self.lock()?.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<JobId, JobRecord>>, RepositoryError> {
        self.jobs
            .lock()
            .map_err(|_| RepositoryError::Unavailable("hiring repository lock poisoned".into()))
    }
}

impl HiringRepository for InMemoryHiringRepository {
    fn criteria(&self, job_id: &JobId) -> Result<Option<JobCriteria>, RepositoryError> {
        Ok(self
            .lock()?
            .get(job_id)
            .and_then(|record| record.criteria.clone()))
    }

    fn candidates(&self, job_id: &JobId) -> Result<Vec<CandidateProfile>, RepositoryError> {
        Ok(self
            .lock()?
            .get(job_id)
            .map(|record| record.candidates.clone())
            .unwrap_or_default())
    }

    fn replace_run(&self, run: RankingRun) -> Result<(), RepositoryError> {
        let mut jobs = self.lock()?;
        let job_id = run.job_id.clone();
        jobs.entry(job_id).or_default().latest_run = Some(run);
        Ok(())
    }

    fn latest_run(&self, job_id: &JobId) -> Result<Option<RankingRun>, RepositoryError> {
        Ok(self
            .lock()?
            .get(job_id)
            .and_then(|record| record.latest_run.clone()))
    }
}
