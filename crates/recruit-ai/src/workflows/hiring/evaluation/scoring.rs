use serde::{Deserialize, Serialize};

use super::super::criteria::JobCriteria;
use super::super::normalizer::contains_name;
use super::super::profile::CandidateProfile;
use super::config::ScoringConfig;
use super::{RuleKind, RuleVerdict, Verdict};

const MIN_SCORE: f64 = 0.0;
const MAX_SCORE: f64 = 100.0;

/// Sub-scores and the weighted overall score, each in `[0, 100]` with two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub overall: f64,
    pub experience: f64,
    pub education: f64,
}

pub(crate) fn score_profile(
    criteria: &JobCriteria,
    profile: &CandidateProfile,
    verdicts: &[RuleVerdict],
    config: &ScoringConfig,
) -> ScoreBreakdown {
    let experience = clamp(experience_score(criteria, profile, verdicts, config));
    let education = clamp(education_score(criteria, profile, verdicts, config));

    let weights = config.weights;
    let weighted = (weights.experience * experience + weights.education * education)
        / (weights.experience + weights.education);

    let soft_failures = verdicts
        .iter()
        .filter(|verdict| {
            matches!(
                verdict.rule,
                RuleKind::Age | RuleKind::Gender | RuleKind::Military
            ) && verdict.failure().is_some()
                && !verdict.auto_reject
        })
        .count();
    let overall = clamp(weighted - config.soft_fail_penalty * soft_failures as f64);

    ScoreBreakdown {
        overall: round2(overall),
        experience: round2(experience),
        education: round2(education),
    }
}

fn experience_score(
    criteria: &JobCriteria,
    profile: &CandidateProfile,
    verdicts: &[RuleVerdict],
    config: &ScoringConfig,
) -> f64 {
    let tenure = match criteria.experience_min_years {
        Some(required) if required > 0 => match profile.tenure_years() {
            Some(years) => config.experience_baseline * (years / f64::from(required)).min(1.0),
            None => 0.0,
        },
        _ => config.experience_baseline,
    };

    let skills: f64 = criteria
        .required_skills
        .iter()
        .filter(|skill| contains_name(&profile.skills, &skill.name))
        .map(|skill| config.skill_bonus.for_priority(skill.priority))
        .sum();

    let companies = if passed(verdicts, RuleKind::TargetCompanies) {
        config.target_company_bonus
    } else {
        0.0
    };

    tenure + skills + companies
}

fn education_score(
    criteria: &JobCriteria,
    profile: &CandidateProfile,
    verdicts: &[RuleVerdict],
    config: &ScoringConfig,
) -> f64 {
    let scale = &config.education;
    let level = match (criteria.education_level, profile.known_education_level()) {
        (Some(required), Some(actual)) => {
            let distance = f64::from(actual.rank()) - f64::from(required.rank());
            if distance >= 0.0 {
                scale.required_baseline + scale.step_above * distance
            } else {
                scale.required_baseline + scale.step_below * distance
            }
        }
        (None, Some(actual)) => scale.open_baseline + scale.open_step * f64::from(actual.rank()),
        (_, None) => scale.unknown_baseline,
    };

    let major = if passed(verdicts, RuleKind::EducationMajor) {
        scale.major_bonus
    } else {
        0.0
    };
    let university = if passed(verdicts, RuleKind::PreferredUniversities) {
        scale.university_bonus
    } else {
        0.0
    };

    level + major + university
}

fn passed(verdicts: &[RuleVerdict], rule: RuleKind) -> bool {
    verdicts
        .iter()
        .any(|verdict| verdict.rule == rule && verdict.outcome == Verdict::Pass)
}

fn clamp(score: f64) -> f64 {
    if score.is_nan() {
        MIN_SCORE
    } else {
        score.clamp(MIN_SCORE, MAX_SCORE)
    }
}

pub(crate) fn round2(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}
