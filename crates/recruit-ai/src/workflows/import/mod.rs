//! Structured candidate CSV ingestion. Resume parsing happens upstream; this only reads
//! already-extracted attributes.

mod parser;

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::workflows::hiring::CandidateProfile;

#[derive(Debug)]
pub enum CandidateImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },
}

impl std::fmt::Display for CandidateImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateImportError::Io(err) => write!(f, "failed to read candidate export: {}", err),
            CandidateImportError::Csv(err) => write!(f, "invalid candidate CSV data: {}", err),
            CandidateImportError::InvalidNumber {
                line,
                column,
                value,
            } => write!(
                f,
                "line {line}: column '{column}' expects a number, got '{value}'"
            ),
        }
    }
}

impl std::error::Error for CandidateImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CandidateImportError::Io(err) => Some(err),
            CandidateImportError::Csv(err) => Some(err),
            CandidateImportError::InvalidNumber { .. } => None,
        }
    }
}

impl From<std::io::Error> for CandidateImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CandidateImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Profiles read from an export plus the rows that could not become a candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateImport {
    pub profiles: Vec<CandidateProfile>,
    /// 1-based CSV lines skipped for lacking an id or a name.
    pub skipped_lines: Vec<u64>,
}

pub struct CandidateCsvImporter;

impl CandidateCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<CandidateImport, CandidateImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<CandidateImport, CandidateImportError> {
        let mut profiles = Vec::new();
        let mut skipped_lines = Vec::new();

        for record in parser::parse_records(reader)? {
            match record.profile {
                Some(profile) => profiles.push(profile),
                None => skipped_lines.push(record.line),
            }
        }

        debug!(
            imported = profiles.len(),
            skipped = skipped_lines.len(),
            "parsed candidate export"
        );
        Ok(CandidateImport {
            profiles,
            skipped_lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::hiring::{EducationLevel, MilitaryStatus, Reported};
    use std::io::Cursor;

    const HEADER: &str = "id,name,email,experience_years,age,gender,military_status,education_level,education_major,university,companies,skills\n";

    #[test]
    fn importer_maps_columns_onto_profiles() {
        let csv = format!(
            "{HEADER}c-1,Amy Chen,amy@example.com,4.5,29,female,completed,Master's,Computer Science,Sharif University,Acme; Globex ,rust;sql;;\n"
        );
        let import = CandidateCsvImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert!(import.skipped_lines.is_empty());
        let profile = &import.profiles[0];
        assert_eq!(profile.id.0, "c-1");
        assert_eq!(profile.experience_years, Some(4.5));
        assert_eq!(profile.age, Some(29));
        assert_eq!(profile.known_education_level(), Some(EducationLevel::Master));
        assert_eq!(
            profile.military_status,
            Some(Reported::Known(MilitaryStatus::Completed))
        );
        assert_eq!(profile.companies, vec!["Acme", "Globex"]);
        assert_eq!(profile.skills, vec!["rust", "sql"]);
    }

    #[test]
    fn blank_cells_are_absent_and_unknown_labels_are_kept() {
        let csv = format!("{HEADER}c-2,Ben,,,,,alternative service,,,,,\n");
        let import = CandidateCsvImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        let profile = &import.profiles[0];
        assert_eq!(profile.email, None);
        assert_eq!(profile.experience_years, None);
        assert_eq!(profile.age, None);
        assert_eq!(profile.gender, None);
        assert_eq!(
            profile.military_status,
            Some(Reported::Unrecognized("alternative service".to_string()))
        );
        assert!(profile.skills.is_empty());
    }

    #[test]
    fn rows_without_identity_are_skipped() {
        let csv = format!("{HEADER},Nameless,,,,,,,,,,\nc-3,,,,,,,,,,,\nc-4,Dana,,2,,,,,,,,\n");
        let import = CandidateCsvImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert_eq!(import.profiles.len(), 1);
        assert_eq!(import.skipped_lines, vec![2, 3]);
    }

    #[test]
    fn malformed_numbers_name_the_line_and_column() {
        let csv = format!("{HEADER}c-5,Eve,,three,,,,,,,,\n");
        let error = CandidateCsvImporter::from_reader(Cursor::new(csv)).expect_err("bad number");

        match error {
            CandidateImportError::InvalidNumber { line, column, value } => {
                assert_eq!(line, 2);
                assert_eq!(column, "experience_years");
                assert_eq!(value, "three");
            }
            other => panic!("expected invalid number, got {other:?}"),
        }
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = CandidateCsvImporter::from_path("./does-not-exist.csv")
            .expect_err("expected io error");

        match error {
            CandidateImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
