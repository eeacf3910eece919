use super::super::criteria::JobCriteria;
use super::super::normalizer::contains_name;
use super::super::profile::CandidateProfile;
use super::policy::RuleFailure;
use super::{RuleKind, RuleVerdict};

/// Run every rule in evaluation order. Always yields one verdict per [`RuleKind`].
pub(crate) fn evaluate_rules(criteria: &JobCriteria, profile: &CandidateProfile) -> Vec<RuleVerdict> {
    RuleKind::ordered()
        .into_iter()
        .map(|rule| match rule {
            RuleKind::Experience => experience(criteria, profile),
            RuleKind::Age => age(criteria, profile),
            RuleKind::Gender => gender(criteria, profile),
            RuleKind::Military => military(criteria, profile),
            RuleKind::EducationLevel => education_level(criteria, profile),
            RuleKind::EducationMajor => education_major(criteria, profile),
            RuleKind::PreferredUniversities => preferred_university(criteria, profile),
            RuleKind::TargetCompanies => target_companies(criteria, profile),
        })
        .collect()
}

fn experience(criteria: &JobCriteria, profile: &CandidateProfile) -> RuleVerdict {
    let rule = RuleKind::Experience;
    let auto_reject = criteria.experience_min_years_auto_reject;
    let Some(required) = criteria.experience_min_years else {
        return RuleVerdict::not_applicable(rule, auto_reject, "no minimum experience");
    };

    let Some(years) = profile.tenure_years() else {
        return RuleVerdict::not_applicable(rule, auto_reject, "experience not reported");
    };
    if years >= f64::from(required) {
        RuleVerdict::passed(
            rule,
            auto_reject,
            format!("{years:.1} years meets minimum of {required}"),
        )
    } else {
        RuleVerdict::failed(
            rule,
            auto_reject,
            RuleFailure::InsufficientExperience {
                required_years: required,
                actual_years: years,
            },
        )
    }
}

fn age(criteria: &JobCriteria, profile: &CandidateProfile) -> RuleVerdict {
    let rule = RuleKind::Age;
    let range = criteria.age_range;
    if !range.is_set() {
        return RuleVerdict::not_applicable(rule, range.auto_reject, "no age range");
    }
    let Some(age) = profile.age else {
        return RuleVerdict::not_applicable(rule, range.auto_reject, "age not reported");
    };

    if range.contains(age) {
        RuleVerdict::passed(
            rule,
            range.auto_reject,
            format!("age {age} within {}", range.describe()),
        )
    } else {
        RuleVerdict::failed(rule, range.auto_reject, RuleFailure::AgeOutOfRange { age, range })
    }
}

fn gender(criteria: &JobCriteria, profile: &CandidateProfile) -> RuleVerdict {
    let rule = RuleKind::Gender;
    let auto_reject = criteria.gender_auto_reject;
    let Some(required) = criteria.gender else {
        return RuleVerdict::not_applicable(rule, auto_reject, "any gender");
    };
    let Some(actual) = profile.known_gender() else {
        return RuleVerdict::not_applicable(rule, auto_reject, "gender not reported");
    };

    if actual == required {
        RuleVerdict::passed(rule, auto_reject, format!("gender {actual}"))
    } else {
        RuleVerdict::failed(
            rule,
            auto_reject,
            RuleFailure::GenderMismatch { required, actual },
        )
    }
}

fn military(criteria: &JobCriteria, profile: &CandidateProfile) -> RuleVerdict {
    let rule = RuleKind::Military;
    let auto_reject = criteria.military_auto_reject;
    let Some(required) = criteria.military_status else {
        return RuleVerdict::not_applicable(rule, auto_reject, "any military status");
    };
    let Some(actual) = profile.known_military_status() else {
        return RuleVerdict::not_applicable(rule, auto_reject, "military status not reported");
    };

    if required.accepts(actual) {
        RuleVerdict::passed(
            rule,
            auto_reject,
            format!("military status {actual} satisfies {required}"),
        )
    } else {
        RuleVerdict::failed(
            rule,
            auto_reject,
            RuleFailure::MilitaryStatusMismatch { required, actual },
        )
    }
}

fn education_level(criteria: &JobCriteria, profile: &CandidateProfile) -> RuleVerdict {
    let rule = RuleKind::EducationLevel;
    let auto_reject = criteria.education_level_auto_reject;
    let Some(required) = criteria.education_level else {
        return RuleVerdict::not_applicable(rule, auto_reject, "any education level");
    };
    let Some(actual) = profile.known_education_level() else {
        return RuleVerdict::not_applicable(rule, auto_reject, "education level not reported");
    };

    if actual >= required {
        RuleVerdict::passed(
            rule,
            auto_reject,
            format!("{actual} meets required {required}"),
        )
    } else {
        RuleVerdict::failed(
            rule,
            auto_reject,
            RuleFailure::EducationBelowRequirement { required, actual },
        )
    }
}

fn education_major(criteria: &JobCriteria, profile: &CandidateProfile) -> RuleVerdict {
    let rule = RuleKind::EducationMajor;
    let auto_reject = criteria.education_major_auto_reject;
    if criteria.accepted_majors().next().is_none() {
        return RuleVerdict::not_applicable(rule, auto_reject, "any major");
    }
    let Some(major) = reported(profile.education_major.as_deref()) else {
        return RuleVerdict::not_applicable(rule, auto_reject, "major not reported");
    };

    if contains_name(criteria.accepted_majors(), major) {
        RuleVerdict::passed(rule, auto_reject, format!("major '{major}' accepted"))
    } else {
        RuleVerdict::failed(
            rule,
            auto_reject,
            RuleFailure::MajorNotAccepted {
                major: major.to_string(),
            },
        )
    }
}

fn preferred_university(criteria: &JobCriteria, profile: &CandidateProfile) -> RuleVerdict {
    let rule = RuleKind::PreferredUniversities;
    let preferred = &criteria.preferred_universities;
    if !preferred.is_active() {
        return RuleVerdict::not_applicable(rule, preferred.auto_reject, "no preferred universities");
    }
    let Some(university) = reported(profile.university.as_deref()) else {
        return RuleVerdict::not_applicable(rule, preferred.auto_reject, "university not reported");
    };

    if contains_name(&preferred.universities, university) {
        RuleVerdict::passed(
            rule,
            preferred.auto_reject,
            format!("'{university}' is a preferred university"),
        )
    } else {
        RuleVerdict::failed(
            rule,
            preferred.auto_reject,
            RuleFailure::UniversityNotPreferred {
                university: university.to_string(),
            },
        )
    }
}

fn target_companies(criteria: &JobCriteria, profile: &CandidateProfile) -> RuleVerdict {
    let rule = RuleKind::TargetCompanies;
    let targets = &criteria.target_companies;
    if !targets.is_active() {
        return RuleVerdict::not_applicable(rule, false, "no target companies");
    }
    if profile.companies.iter().all(|company| company.trim().is_empty()) {
        return RuleVerdict::not_applicable(rule, false, "no work history reported");
    }

    match profile
        .companies
        .iter()
        .find(|company| contains_name(&targets.companies, company))
    {
        Some(company) => RuleVerdict::passed(rule, false, format!("worked at '{company}'")),
        None => RuleVerdict::failed(rule, false, RuleFailure::NoTargetCompany),
    }
}

fn reported(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::hiring::criteria::{MilitaryRequirement, TargetCompanies};
    use crate::workflows::hiring::evaluation::Verdict;
    use crate::workflows::hiring::profile::{MilitaryStatus, Reported};

    fn verdict_for(verdicts: &[RuleVerdict], rule: RuleKind) -> &RuleVerdict {
        verdicts
            .iter()
            .find(|verdict| verdict.rule == rule)
            .expect("every rule yields a verdict")
    }

    #[test]
    fn verdicts_follow_rule_order() {
        let verdicts = evaluate_rules(
            &JobCriteria::default(),
            &CandidateProfile::new("c-1", "Amy"),
        );
        let rules: Vec<_> = verdicts.iter().map(|verdict| verdict.rule).collect();
        assert_eq!(rules, RuleKind::ordered().to_vec());
        assert!(verdicts
            .iter()
            .all(|verdict| verdict.outcome == Verdict::NotApplicable));
    }

    #[test]
    fn unknown_military_status_is_not_applicable() {
        let criteria = JobCriteria {
            military_status: Some(MilitaryRequirement::CompletedOrFullExempt),
            military_auto_reject: true,
            ..JobCriteria::default()
        };
        let mut profile = CandidateProfile::new("c-1", "Amy");
        profile.military_status = Some(Reported::Unrecognized("alternative service".into()));

        let verdicts = evaluate_rules(&criteria, &profile);
        let verdict = verdict_for(&verdicts, RuleKind::Military);
        assert_eq!(verdict.outcome, Verdict::NotApplicable);
        assert!(!verdict.disqualifies());

        profile.military_status = Some(Reported::Known(MilitaryStatus::NotServed));
        let verdicts = evaluate_rules(&criteria, &profile);
        assert!(verdict_for(&verdicts, RuleKind::Military).disqualifies());
    }

    #[test]
    fn target_companies_never_disqualify() {
        let criteria = JobCriteria {
            target_companies: TargetCompanies {
                enabled: true,
                companies: vec!["Acme Corp".into()],
            },
            ..JobCriteria::default()
        };
        let mut profile = CandidateProfile::new("c-1", "Amy");
        profile.companies = vec!["Globex".into()];

        let verdicts = evaluate_rules(&criteria, &profile);
        let verdict = verdict_for(&verdicts, RuleKind::TargetCompanies);
        assert_eq!(verdict.outcome, Verdict::Fail(RuleFailure::NoTargetCompany));
        assert!(!verdict.disqualifies());

        profile.companies.push("acme_corp".into());
        let verdicts = evaluate_rules(&criteria, &profile);
        assert_eq!(
            verdict_for(&verdicts, RuleKind::TargetCompanies).outcome,
            Verdict::Pass
        );
    }

    #[test]
    fn majors_match_case_insensitively() {
        let criteria = JobCriteria {
            education_majors: vec!["Computer Science".into(), " ".into()],
            education_major_auto_reject: true,
            ..JobCriteria::default()
        };
        let mut profile = CandidateProfile::new("c-1", "Amy");
        profile.education_major = Some("computer_science".into());

        let verdicts = evaluate_rules(&criteria, &profile);
        assert_eq!(
            verdict_for(&verdicts, RuleKind::EducationMajor).outcome,
            Verdict::Pass
        );
    }
}
