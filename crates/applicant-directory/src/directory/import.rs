use std::io::Read;

use serde::{Deserialize, Deserializer, Serialize};

use super::domain::ApplicantSubmission;
use super::service::DirectoryError;

const REQUIRED_COLUMNS: [&str; 2] = ["name", "email"];

/// One data row of an applicant CSV export, still unvalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    /// 1-based line in the source file, header included.
    pub line: u64,
    /// The row's fields, or why the row could not be read.
    pub submission: Result<ApplicantSubmission, String>,
}

/// Parses `name,email,role,location,skills,experience,expected_salary,status`
/// rows. Headers are matched by name; a skills cell may separate entries with
/// commas or semicolons.
///
/// Only an unreadable header or one lacking `name`/`email` fails the batch.
/// Malformed records come back as rows carrying the parse error.
pub fn parse_rows<R: Read>(reader: R) -> Result<Vec<ImportRow>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    if let Some(column) = REQUIRED_COLUMNS
        .iter()
        .copied()
        .find(|column| !headers.iter().any(|header| header == *column))
    {
        return Err(ImportError::MissingColumn { column });
    }

    let mut rows = Vec::new();
    let mut last_line = 1;

    for record in csv_reader.records() {
        let (line, submission) = match record {
            Ok(record) => {
                let line = record
                    .position()
                    .map(|position| position.line())
                    .unwrap_or(last_line + 1);
                let submission = record
                    .deserialize(Some(&headers))
                    .map(|row: CsvApplicantRow| row.into_submission())
                    .map_err(|err| err.to_string());
                (line, submission)
            }
            Err(err) => {
                let line = err
                    .position()
                    .map(|position| position.line())
                    .unwrap_or(last_line + 1);
                (line, Err(err.to_string()))
            }
        };
        last_line = line;
        rows.push(ImportRow { line, submission });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct CsvApplicantRow {
    name: String,
    email: String,
    #[serde(default)]
    role: String,
    #[serde(default)]
    location: String,
    #[serde(default, deserialize_with = "skills_cell")]
    skills: String,
    #[serde(default)]
    experience: String,
    #[serde(default)]
    expected_salary: String,
    #[serde(default)]
    status: String,
}

impl CsvApplicantRow {
    fn into_submission(self) -> ApplicantSubmission {
        ApplicantSubmission {
            name: self.name,
            email: self.email,
            role: self.role,
            location: self.location,
            skills: self.skills,
            experience: self.experience,
            expected_salary: self.expected_salary,
            status: self.status,
        }
    }
}

fn skills_cell<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|value| value.replace(';', ",")).unwrap_or_default())
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub added: usize,
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: String,
}

/// Import failure that aborted the whole batch.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read applicant import: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid applicant CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("applicant CSV header has no '{column}' column")]
    MissingColumn { column: &'static str },
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}
