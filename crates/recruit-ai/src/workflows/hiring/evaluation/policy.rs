use serde::{Deserialize, Serialize};

use super::super::criteria::{AgeRange, MilitaryRequirement};
use super::super::profile::{EducationLevel, Gender, MilitaryStatus};
use super::{RuleKind, RuleVerdict};

/// Why a rule failed for a candidate. When the rule carries an auto-reject flag this
/// becomes the candidate's rejection reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleFailure {
    InsufficientExperience {
        required_years: u32,
        actual_years: f64,
    },
    AgeOutOfRange {
        age: u32,
        range: AgeRange,
    },
    GenderMismatch {
        required: Gender,
        actual: Gender,
    },
    MilitaryStatusMismatch {
        required: MilitaryRequirement,
        actual: MilitaryStatus,
    },
    EducationBelowRequirement {
        required: EducationLevel,
        actual: EducationLevel,
    },
    MajorNotAccepted {
        major: String,
    },
    UniversityNotPreferred {
        university: String,
    },
    NoTargetCompany,
}

impl RuleFailure {
    pub fn summary(&self) -> String {
        match self {
            RuleFailure::InsufficientExperience {
                required_years,
                actual_years,
            } => format!(
                "Insufficient experience: {actual_years:.1} years (required: {required_years})"
            ),
            RuleFailure::AgeOutOfRange { age, range } => {
                format!("Age {age} outside required range ({})", range.describe())
            }
            RuleFailure::GenderMismatch { required, actual } => {
                format!("Gender {actual} does not match required {required}")
            }
            RuleFailure::MilitaryStatusMismatch { required, actual } => {
                format!("Military status {actual} does not satisfy {required}")
            }
            RuleFailure::EducationBelowRequirement { required, actual } => {
                format!("Education level {actual} below required {required}")
            }
            RuleFailure::MajorNotAccepted { major } => {
                format!("Education major '{major}' is not an accepted major")
            }
            RuleFailure::UniversityNotPreferred { university } => {
                format!("University '{university}' is not on the preferred list")
            }
            RuleFailure::NoTargetCompany => "No experience at a target company".to_string(),
        }
    }
}

/// First failing rule, in evaluation order, whose criterion asks for auto-rejection.
pub(crate) fn first_disqualifier(verdicts: &[RuleVerdict]) -> Option<(RuleKind, &RuleFailure)> {
    verdicts
        .iter()
        .filter(|verdict| verdict.auto_reject)
        .find_map(|verdict| verdict.failure().map(|failure| (verdict.rule, failure)))
}
