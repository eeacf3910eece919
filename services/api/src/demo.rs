use crate::infra::{load_batches, InMemoryHiringRepository, JobBatch};
use clap::Args;
use recruit_ai::config::AppConfig;
use recruit_ai::error::AppError;
use recruit_ai::workflows::hiring::{
    CandidateProfile, EducationLevel, EvaluationEngine, EvaluationResult, Gender,
    InMemoryPipelineStore, JobCriteria, JobId, MilitaryRequirement, MilitaryStatus,
    PipelineCategory, RankingRow, RankingService, RankingServiceError, Reported, ScoringConfig,
    SkillPriority, SkillRequirement, TargetCompanies,
};
use recruit_ai::workflows::import::CandidateCsvImporter;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// JSON file holding a list of `{job_id, criteria, candidates}` batches
    #[arg(long)]
    pub(crate) batch: PathBuf,
    /// Optional candidate CSV export appended to every batch
    #[arg(long)]
    pub(crate) candidates_csv: Option<PathBuf>,
    /// Print machine-readable JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Stop after the ranking table and skip the pipeline walk-through
    #[arg(long)]
    pub(crate) skip_pipeline: bool,
}

#[derive(Debug, Serialize)]
struct RankedBatch {
    job_id: JobId,
    results: Vec<EvaluationResult>,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let RankArgs {
        batch,
        candidates_csv,
        json,
    } = args;

    let config = AppConfig::load()?;
    let engine = EvaluationEngine::new(config.scoring)?;

    let mut batches = load_batches(&batch)?;
    if let Some(path) = candidates_csv {
        let import = CandidateCsvImporter::from_path(&path)?;
        if !import.skipped_lines.is_empty() && !json {
            println!(
                "Skipped {} CSV rows without an id or name (lines {:?})",
                import.skipped_lines.len(),
                import.skipped_lines
            );
        }
        for batch in &mut batches {
            batch.candidates.extend(import.profiles.iter().cloned());
        }
    }

    let ranked = rank_batches(&engine, batches)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
        return Ok(());
    }

    for batch in &ranked {
        println!("\nRanking for {}", batch.job_id.0);
        for result in &batch.results {
            println!("{}", render_result(result));
        }
    }
    Ok(())
}

fn rank_batches(
    engine: &EvaluationEngine,
    batches: Vec<JobBatch>,
) -> Result<Vec<RankedBatch>, AppError> {
    batches
        .into_iter()
        .map(|batch| {
            let results = engine.run(&batch.job_id, &batch.criteria, &batch.candidates)?;
            Ok(RankedBatch {
                job_id: batch.job_id,
                results,
            })
        })
        .collect()
}

fn render_result(result: &EvaluationResult) -> String {
    match (result.rank(), result.scores()) {
        (Some(rank), Some(scores)) => format!(
            "  #{:<3} {:<20} overall {:>6.2} | experience {:>6.2} | education {:>6.2}",
            rank, result.candidate_name, scores.overall, scores.experience, scores.education
        ),
        _ => format!(
            "  --   {:<20} rejected: {}",
            result.candidate_name,
            result.rejection_reason().unwrap_or("unspecified")
        ),
    }
}

fn render_row(row: &RankingRow) -> String {
    let rank = row
        .rank
        .map(|rank| format!("#{rank}"))
        .unwrap_or_else(|| "--".to_string());
    let favorite = if row.is_favorite { " *" } else { "" };
    format!(
        "  {:<4} {:<20} {:<20}{}",
        rank, row.candidate_name, row.category, favorite
    )
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { skip_pipeline } = args;

    println!("Candidate ranking demo");
    let batch = demo_batch();
    let job_id = batch.job_id.clone();
    let repository = Arc::new(
        InMemoryHiringRepository::seeded(vec![batch]).map_err(RankingServiceError::from)?,
    );
    let service = RankingService::new(
        repository,
        Arc::new(InMemoryPipelineStore::default()),
        ScoringConfig::default(),
    )?;

    let refresh = service.refresh(&job_id)?;
    println!(
        "- Scored {} candidates for {}: {} ranked, {} auto-rejected",
        refresh.total_candidates, job_id.0, refresh.ranked_candidates, refresh.auto_rejected
    );

    let rows = service.ranking(&job_id)?;
    println!("\nInitial pipeline");
    for row in &rows {
        println!("{}", render_row(row));
    }

    if skip_pipeline {
        return Ok(());
    }

    println!("\nPipeline walk-through");
    if let Some(leader) = rows.iter().find(|row| row.rank == Some(1)) {
        for step in [
            PipelineCategory::InterviewScheduled,
            PipelineCategory::Interviewed,
            PipelineCategory::OfferSent,
            PipelineCategory::Hired,
        ] {
            let state = service.set_category(&job_id, &leader.candidate_id, step)?;
            println!("- {} moved to {}", leader.candidate_name, state.category);
        }
    }
    if let Some(runner_up) = rows.iter().find(|row| row.rank == Some(2)) {
        service.set_favorite(&job_id, &runner_up.candidate_id, true)?;
        println!("- {} marked as favorite", runner_up.candidate_name);
    }
    if let Some(rejected) = rows.iter().find(|row| row.auto_rejected) {
        match service.set_category(&job_id, &rejected.candidate_id, PipelineCategory::Shortlisted)
        {
            Ok(state) => println!("- {} moved to {}", rejected.candidate_name, state.category),
            Err(err) => println!("- {} stays rejected: {}", rejected.candidate_name, err),
        }
    }

    let summary = service.summary(&job_id)?;
    println!(
        "\nReview: {} candidates | {} auto-rejected | average score {:.2}",
        summary.total_candidates, summary.auto_rejected, summary.average_score
    );
    for row in &summary.top_candidates {
        println!("{}", render_row(row));
    }
    for row in &summary.rejected_candidates {
        println!(
            "{}  ({})",
            render_row(row),
            row.rejection_reason.as_deref().unwrap_or("unspecified")
        );
    }

    Ok(())
}

fn demo_batch() -> JobBatch {
    let criteria = JobCriteria {
        required_skills: vec![
            SkillRequirement::new("Rust", SkillPriority::Critical),
            SkillRequirement::new("Kubernetes", SkillPriority::Important),
            SkillRequirement::new("Terraform", SkillPriority::NiceToHave),
        ],
        experience_min_years: Some(3),
        experience_min_years_auto_reject: true,
        military_status: Some(MilitaryRequirement::CompletedOrFullExempt),
        military_auto_reject: true,
        education_level: Some(EducationLevel::Bachelor),
        education_majors: vec!["Computer Engineering".into(), "Computer Science".into()],
        target_companies: TargetCompanies {
            enabled: true,
            companies: vec!["Snapp".into(), "Cafe Bazaar".into()],
        },
        ..JobCriteria::default()
    };

    let candidates = vec![
        demo_candidate("c-101", "Parisa Nouri", 7.0, |profile| {
            profile.gender = Some(Reported::Known(Gender::Female));
            profile.education_level = Some(Reported::Known(EducationLevel::Master));
            profile.education_major = Some("Computer Engineering".into());
            profile.companies = vec!["Snapp".into()];
            profile.skills = vec!["rust".into(), "kubernetes".into()];
        }),
        demo_candidate("c-102", "Omid Tehrani", 4.0, |profile| {
            profile.gender = Some(Reported::Known(Gender::Male));
            profile.military_status = Some(Reported::Known(MilitaryStatus::Completed));
            profile.education_level = Some(Reported::Known(EducationLevel::Bachelor));
            profile.skills = vec!["Rust".into(), "Terraform".into()];
        }),
        demo_candidate("c-103", "Sahar Rezaei", 3.0, |profile| {
            profile.education_level = Some(Reported::Known(EducationLevel::Diploma));
            profile.skills = vec!["kubernetes".into()];
        }),
        demo_candidate("c-104", "Kian Sadeghi", 2.0, |profile| {
            profile.education_level = Some(Reported::Known(EducationLevel::Doctorate));
            profile.skills = vec!["rust".into(), "kubernetes".into(), "terraform".into()];
        }),
        demo_candidate("c-105", "Navid Hosseini", 6.0, |profile| {
            profile.gender = Some(Reported::Known(Gender::Male));
            profile.military_status = Some(Reported::Known(MilitaryStatus::NotServed));
            profile.education_level = Some(Reported::Known(EducationLevel::Bachelor));
            profile.skills = vec!["rust".into()];
        }),
    ];

    JobBatch {
        job_id: JobId("job-platform-eng".into()),
        criteria,
        candidates,
    }
}

fn demo_candidate(
    id: &str,
    name: &str,
    experience_years: f64,
    customize: impl FnOnce(&mut CandidateProfile),
) -> CandidateProfile {
    let mut profile = CandidateProfile::new(id, name);
    profile.experience_years = Some(experience_years);
    customize(&mut profile);
    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> EvaluationEngine {
        EvaluationEngine::new(ScoringConfig::default()).expect("valid config")
    }

    #[test]
    fn demo_batch_ranks_three_and_rejects_two() {
        let ranked = rank_batches(&engine(), vec![demo_batch()]).expect("demo batch ranks");
        let results = &ranked[0].results;

        assert_eq!(results.len(), 5);
        assert_eq!(results.iter().filter(|result| result.auto_rejected()).count(), 2);
        assert_eq!(results[0].candidate_name, "Parisa Nouri");
        assert_eq!(results[0].rank(), Some(1));
    }

    #[test]
    fn rendered_rows_show_rank_or_rejection() {
        let ranked = rank_batches(&engine(), vec![demo_batch()]).expect("demo batch ranks");
        let results = &ranked[0].results;

        assert!(render_result(&results[0]).contains("#1"));
        let rejected = render_result(&results[4]);
        assert!(rejected.contains("rejected:"));
    }

    #[test]
    fn demo_runs_end_to_end() {
        run_demo(DemoArgs::default()).expect("demo completes");
    }
}
