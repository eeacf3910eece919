use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::normalizer::normalize_name;

/// Identifier wrapper for candidates supplied by the profile-storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Structured applicant attributes relevant to evaluation. Resume extraction happens
/// upstream; the engine only reads what it is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub id: CandidateId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_years: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Reported<Gender>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub military_status: Option<Reported<MilitaryStatus>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education_level: Option<Reported<EducationLevel>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education_major: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(default)]
    pub companies: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl CandidateProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: CandidateId(id.into()),
            name: name.into(),
            email: None,
            experience_years: None,
            age: None,
            gender: None,
            military_status: None,
            education_level: None,
            education_major: None,
            university: None,
            companies: Vec::new(),
            skills: Vec::new(),
        }
    }

    /// Reported years of experience; negative or non-finite values count as zero.
    /// `None` means the candidate never reported any.
    pub fn tenure_years(&self) -> Option<f64> {
        self.experience_years
            .map(|years| if years.is_finite() && years > 0.0 { years } else { 0.0 })
    }

    pub fn known_gender(&self) -> Option<Gender> {
        self.gender.as_ref().and_then(Reported::known).copied()
    }

    pub fn known_military_status(&self) -> Option<MilitaryStatus> {
        self.military_status
            .as_ref()
            .and_then(Reported::known)
            .copied()
    }

    pub fn known_education_level(&self) -> Option<EducationLevel> {
        self.education_level
            .as_ref()
            .and_then(Reported::known)
            .copied()
    }
}

/// A candidate attribute as reported upstream. Values outside the known vocabulary are kept
/// verbatim so they can be audited, but they never count against the candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reported<T> {
    Known(T),
    Unrecognized(String),
}

impl<T: FromStr> Reported<T> {
    /// Parse a raw value; blank input means the attribute was not reported at all.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(match trimmed.parse::<T>() {
            Ok(value) => Reported::Known(value),
            Err(_) => Reported::Unrecognized(trimmed.to_string()),
        })
    }
}

impl<T> Reported<T> {
    pub fn known(&self) -> Option<&T> {
        match self {
            Reported::Known(value) => Some(value),
            Reported::Unrecognized(_) => None,
        }
    }
}

impl<T: fmt::Display> Serialize for Reported<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reported::Known(value) => serializer.collect_str(value),
            Reported::Unrecognized(raw) => serializer.serialize_str(raw),
        }
    }
}

impl<'de, T: FromStr> Deserialize<'de> for Reported<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Reported::parse(&raw).unwrap_or(Reported::Unrecognized(raw)))
    }
}

/// Error returned when a label is outside an enum's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value '{value}'")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownLabel {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const fn label(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_name(value).as_str() {
            "male" | "m" | "man" => Ok(Gender::Male),
            "female" | "f" | "woman" => Ok(Gender::Female),
            _ => Err(UnknownLabel::new("gender", value)),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Military service situation of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilitaryStatus {
    Completed,
    FullExempt,
    EducationalExempt,
    NotServed,
}

impl MilitaryStatus {
    pub const fn label(self) -> &'static str {
        match self {
            MilitaryStatus::Completed => "completed",
            MilitaryStatus::FullExempt => "full_exempt",
            MilitaryStatus::EducationalExempt => "educational_exempt",
            MilitaryStatus::NotServed => "not_served",
        }
    }
}

impl FromStr for MilitaryStatus {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_name(value).as_str() {
            "completed" | "served" | "service completed" => Ok(MilitaryStatus::Completed),
            "full exempt" | "exempt" | "permanent exempt" => Ok(MilitaryStatus::FullExempt),
            "educational exempt" | "student exempt" => Ok(MilitaryStatus::EducationalExempt),
            "not served" | "pending" | "not completed" => Ok(MilitaryStatus::NotServed),
            _ => Err(UnknownLabel::new("military status", value)),
        }
    }
}

impl fmt::Display for MilitaryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Degree levels, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    Diploma,
    Bachelor,
    Master,
    Doctorate,
    Postdoctoral,
}

impl EducationLevel {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Diploma,
            Self::Bachelor,
            Self::Master,
            Self::Doctorate,
            Self::Postdoctoral,
        ]
    }

    /// Zero-based position on the ordered scale.
    pub const fn rank(self) -> u8 {
        match self {
            Self::Diploma => 0,
            Self::Bachelor => 1,
            Self::Master => 2,
            Self::Doctorate => 3,
            Self::Postdoctoral => 4,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Diploma => "diploma",
            Self::Bachelor => "bachelor",
            Self::Master => "master",
            Self::Doctorate => "doctorate",
            Self::Postdoctoral => "postdoctoral",
        }
    }
}

impl FromStr for EducationLevel {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_name(value).as_str() {
            "diploma" => Ok(Self::Diploma),
            "bachelor" | "bachelors" | "bachelor's" | "bsc" | "ba" => Ok(Self::Bachelor),
            "master" | "masters" | "master's" | "msc" | "ma" => Ok(Self::Master),
            "doctorate" | "phd" | "doctoral" => Ok(Self::Doctorate),
            "postdoctoral" | "postdoc" | "post doctoral" => Ok(Self::Postdoctoral),
            _ => Err(UnknownLabel::new("education level", value)),
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
