use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::CandidateImportError;
use crate::workflows::hiring::{CandidateId, CandidateProfile, Reported};

/// One parsed CSV row; `profile` is `None` when the row lacked an id or name.
#[derive(Debug)]
pub(crate) struct CandidateRecord {
    pub(crate) line: u64,
    pub(crate) profile: Option<CandidateProfile>,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<CandidateRecord>, CandidateImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut records = Vec::new();

    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map_or(0, csv::Position::line);
        let row: CandidateRow = record.deserialize(Some(&headers))?;
        records.push(row.into_record(line)?);
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct CandidateRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    experience_years: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    age: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    gender: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    military_status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    education_level: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    education_major: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    university: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    companies: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    skills: Option<String>,
}

impl CandidateRow {
    fn into_record(self, line: u64) -> Result<CandidateRecord, CandidateImportError> {
        let (Some(id), Some(name)) = (self.id, self.name) else {
            return Ok(CandidateRecord {
                line,
                profile: None,
            });
        };

        let experience_years = self
            .experience_years
            .as_deref()
            .map(|raw| parse_number::<f64>(line, "experience_years", raw))
            .transpose()?;
        let age = self
            .age
            .as_deref()
            .map(|raw| parse_number::<u32>(line, "age", raw))
            .transpose()?;

        let profile = CandidateProfile {
            id: CandidateId(id),
            name,
            email: self.email,
            experience_years,
            age,
            gender: self.gender.as_deref().and_then(Reported::parse),
            military_status: self.military_status.as_deref().and_then(Reported::parse),
            education_level: self.education_level.as_deref().and_then(Reported::parse),
            education_major: self.education_major,
            university: self.university,
            companies: split_list(self.companies.as_deref()),
            skills: split_list(self.skills.as_deref()),
        };

        Ok(CandidateRecord {
            line,
            profile: Some(profile),
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    line: u64,
    column: &'static str,
    raw: &str,
) -> Result<T, CandidateImportError> {
    raw.parse::<T>().map_err(|_| CandidateImportError::InvalidNumber {
        line,
        column,
        value: raw.to_string(),
    })
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(';')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
