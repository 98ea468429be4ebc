use serde::{Deserialize, Serialize};

/// One entry in the directory, identified by its e-mail address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub name: String,
    pub email: String,
    pub role: String,
    pub location: String,
    pub skills: Vec<String>,
    pub experience: u32,
    pub expected_salary: u64,
    pub status: String,
}

impl Applicant {
    /// Builds an applicant from already typed fields.
    ///
    /// Name and e-mail are trimmed and must not be empty. The remaining text
    /// fields are stored as given.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
        location: impl Into<String>,
        skills: Vec<String>,
        experience: u32,
        expected_salary: u64,
        status: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = required("name", name.into())?;
        let email = required("email", email.into())?;

        Ok(Self {
            name,
            email,
            role: role.into(),
            location: location.into(),
            skills,
            experience,
            expected_salary,
            status: status.into(),
        })
    }

    /// Case-folded e-mail used for uniqueness checks.
    pub fn identity_key(&self) -> String {
        fold(&self.email)
    }

    pub fn matches_email(&self, email: &str) -> bool {
        eq_folded(&self.email, email)
    }

    pub fn matches_name(&self, name: &str) -> bool {
        eq_folded(&self.name, name)
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|held| eq_folded(held, skill))
    }
}

/// Raw, untyped applicant input as collected from a prompt or an import row.
///
/// Numeric fields stay textual until [`ApplicantSubmission::into_applicant`]
/// so malformed input is rejected before anything reaches the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantSubmission {
    pub name: String,
    pub email: String,
    pub role: String,
    pub location: String,
    pub skills: String,
    pub experience: String,
    pub expected_salary: String,
    pub status: String,
}

impl ApplicantSubmission {
    pub fn into_applicant(self) -> Result<Applicant, ValidationError> {
        let experience = parse_count("experience", &self.experience)?;
        let expected_salary = parse_count("expected_salary", &self.expected_salary)?;

        Applicant::new(
            self.name,
            self.email,
            self.role.trim(),
            self.location.trim(),
            parse_skills(&self.skills),
            experience,
            expected_salary,
            self.status.trim(),
        )
    }
}

/// Splits a comma separated skill list, dropping blank entries.
///
/// Repeated skills are kept as listed.
pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses a non-negative integer field typed by a user.
///
/// Surrounding whitespace and a single leading `+` are accepted; signs other
/// than that, decimals, and blank input are not.
pub fn parse_count<T>(field: &'static str, raw: &str) -> Result<T, ValidationError>
where
    T: std::str::FromStr,
{
    let trimmed = raw.trim();
    trimmed
        .parse::<T>()
        .map_err(|_| ValidationError::InvalidNumber {
            field,
            value: trimmed.to_string(),
        })
}

fn required(field: &'static str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(trimmed.to_string())
}

pub(crate) fn fold(value: &str) -> String {
    value.to_lowercase()
}

pub(crate) fn eq_folded(left: &str, right: &str) -> bool {
    left == right || fold(left) == fold(right)
}

/// Malformed input rejected at a mutation or query boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("{field} must be a non-negative whole number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("invalid {field} range: minimum {min} is greater than maximum {max}")]
    InvalidRange {
        field: &'static str,
        min: u64,
        max: u64,
    },
}
