use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::normalizer::normalize_name;
use super::profile::{CandidateId, EducationLevel, Gender, MilitaryStatus, UnknownLabel};

/// Identifier wrapper for job postings owned by the criteria-storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hard requirements and soft preferences for one job.
///
/// Every `*_auto_reject` flag is only meaningful when its paired value is concrete; a flag on
/// an unset criterion never rejects anyone.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobCriteria {
    pub required_skills: Vec<SkillRequirement>,
    pub experience_min_years: Option<u32>,
    pub experience_min_years_auto_reject: bool,
    pub age_range: AgeRange,
    #[serde(with = "any_as_none")]
    pub gender: Option<Gender>,
    pub gender_auto_reject: bool,
    #[serde(with = "any_as_none")]
    pub military_status: Option<MilitaryRequirement>,
    pub military_auto_reject: bool,
    #[serde(with = "any_as_none")]
    pub education_level: Option<EducationLevel>,
    pub education_level_auto_reject: bool,
    pub education_majors: Vec<String>,
    pub education_major_auto_reject: bool,
    pub preferred_universities: PreferredUniversities,
    pub target_companies: TargetCompanies,
}

impl JobCriteria {
    /// Reject malformed criteria before any candidate is looked at.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let (Some(min), Some(max)) = (self.age_range.min, self.age_range.max) {
            if min > max {
                return Err(ValidationError::InvalidAgeRange { min, max });
            }
        }

        let mut seen = BTreeSet::new();
        for skill in &self.required_skills {
            let normalized = normalize_name(&skill.name);
            if normalized.is_empty() {
                return Err(ValidationError::BlankSkill);
            }
            if !seen.insert(normalized) {
                return Err(ValidationError::DuplicateSkill(skill.name.clone()));
            }
        }

        Ok(())
    }

    /// Majors constrain candidates only when at least one non-blank major is listed.
    pub fn accepted_majors(&self) -> impl Iterator<Item = &String> {
        self.education_majors
            .iter()
            .filter(|major| !major.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRequirement {
    pub name: String,
    pub priority: SkillPriority,
}

impl SkillRequirement {
    pub fn new(name: impl Into<String>, priority: SkillPriority) -> Self {
        Self {
            name: name.into(),
            priority,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillPriority {
    #[serde(alias = "Critical")]
    Critical,
    #[serde(alias = "Important")]
    Important,
    #[serde(alias = "Nice-to-have", alias = "nice-to-have")]
    NiceToHave,
}

impl SkillPriority {
    pub const fn label(self) -> &'static str {
        match self {
            SkillPriority::Critical => "Critical",
            SkillPriority::Important => "Important",
            SkillPriority::NiceToHave => "Nice-to-have",
        }
    }
}

/// Inclusive age bounds; either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgeRange {
    pub min: Option<u32>,
    pub max: Option<u32>,
    pub auto_reject: bool,
}

impl AgeRange {
    pub fn is_set(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    pub fn contains(&self, age: u32) -> bool {
        self.min.map_or(true, |min| age >= min) && self.max.map_or(true, |max| age <= max)
    }

    pub fn describe(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("{min}-{max}"),
            (Some(min), None) => format!("{min}+"),
            (None, Some(max)) => format!("up to {max}"),
            (None, None) => "any".to_string(),
        }
    }
}

/// Accepted military service situations for a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilitaryRequirement {
    CompletedOrFullExempt,
    EducationalExempt,
}

impl MilitaryRequirement {
    pub const fn label(self) -> &'static str {
        match self {
            Self::CompletedOrFullExempt => "completed_or_full_exempt",
            Self::EducationalExempt => "educational_exempt",
        }
    }

    pub fn accepts(self, status: MilitaryStatus) -> bool {
        match self {
            Self::CompletedOrFullExempt => {
                matches!(status, MilitaryStatus::Completed | MilitaryStatus::FullExempt)
            }
            Self::EducationalExempt => matches!(
                status,
                MilitaryStatus::Completed
                    | MilitaryStatus::FullExempt
                    | MilitaryStatus::EducationalExempt
            ),
        }
    }
}

impl FromStr for MilitaryRequirement {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_name(value).as_str() {
            "completed or full exempt" => Ok(Self::CompletedOrFullExempt),
            "educational exempt" => Ok(Self::EducationalExempt),
            _ => Err(UnknownLabel {
                kind: "military requirement",
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for MilitaryRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferredUniversities {
    pub enabled: bool,
    pub auto_reject: bool,
    pub universities: Vec<String>,
}

impl PreferredUniversities {
    pub fn is_active(&self) -> bool {
        self.enabled && self.universities.iter().any(|name| !name.trim().is_empty())
    }
}

/// Preference signal only; never disqualifying.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetCompanies {
    pub enabled: bool,
    pub companies: Vec<String>,
}

impl TargetCompanies {
    pub fn is_active(&self) -> bool {
        self.enabled && self.companies.iter().any(|name| !name.trim().is_empty())
    }
}

/// Malformed input that refuses a whole evaluation batch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("age range minimum {min} exceeds maximum {max}")]
    InvalidAgeRange { min: u32, max: u32 },
    #[error("required skill '{0}' is listed more than once")]
    DuplicateSkill(String),
    #[error("required skill names must not be blank")]
    BlankSkill,
    #[error("candidate '{0}' appears more than once in the batch")]
    DuplicateCandidate(CandidateId),
    #[error("scoring weights must be finite, non-negative, and not all zero (experience {experience}, education {education})")]
    InvalidWeights { experience: f64, education: f64 },
    #[error("scoring parameter '{0}' must be finite and non-negative")]
    InvalidScoringParameter(&'static str),
}

/// `"any"`, blank strings, and null all mean the criterion is unset.
mod any_as_none {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::workflows::hiring::normalizer::normalize_name;

    pub(super) fn serialize<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Display,
    {
        match value {
            Some(inner) => serializer.collect_str(inner),
            None => serializer.serialize_str("any"),
        }
    }

    pub(super) fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        T::Err: Display,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(value) => {
                let normalized = normalize_name(&value);
                if normalized.is_empty() || normalized == "any" {
                    Ok(None)
                } else {
                    value.parse::<T>().map(Some).map_err(de::Error::custom)
                }
            }
        }
    }
}
