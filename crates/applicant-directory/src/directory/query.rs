//! Read-only lookups and filters over a collection.
//!
//! Every function borrows the collection and returns matches in collection
//! order. An unmatched query is an empty result, never an error.

use std::fmt;
use std::str::FromStr;

use super::domain::{eq_folded, Applicant, ValidationError};

/// How a single-record identifier falls back to names once no e-mail matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdentifierPolicy {
    /// Take the first record in collection order whose name matches.
    #[default]
    FirstMatch,
    /// Fail when more than one record carries the name.
    RejectAmbiguous,
}

impl IdentifierPolicy {
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstMatch => "first",
            Self::RejectAmbiguous => "reject",
        }
    }
}

impl FromStr for IdentifierPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "first" | "first_match" | "first-match" => Ok(Self::FirstMatch),
            "reject" | "reject_ambiguous" | "reject-ambiguous" => Ok(Self::RejectAmbiguous),
            other => Err(format!(
                "unknown name match policy '{other}' (expected 'first' or 'reject')"
            )),
        }
    }
}

impl fmt::Display for IdentifierPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Name fallback matched several records under [`IdentifierPolicy::RejectAmbiguous`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identifier '{identifier}' matches {matches} applicants by name")]
pub struct AmbiguousIdentifier {
    pub identifier: String,
    pub matches: usize,
}

/// Position of the record `identifier` resolves to.
pub fn resolve_index(
    collection: &[Applicant],
    identifier: &str,
    policy: IdentifierPolicy,
) -> Result<Option<usize>, AmbiguousIdentifier> {
    if let Some(index) = collection
        .iter()
        .position(|applicant| applicant.matches_email(identifier))
    {
        return Ok(Some(index));
    }

    let mut by_name = collection
        .iter()
        .enumerate()
        .filter(|(_, applicant)| applicant.matches_name(identifier))
        .map(|(index, _)| index);

    let first = by_name.next();
    if policy == IdentifierPolicy::RejectAmbiguous && first.is_some() {
        let others = by_name.count();
        if others > 0 {
            return Err(AmbiguousIdentifier {
                identifier: identifier.to_string(),
                matches: others + 1,
            });
        }
    }

    Ok(first)
}

pub fn resolve_identifier<'a>(
    collection: &'a [Applicant],
    identifier: &str,
    policy: IdentifierPolicy,
) -> Result<Option<&'a Applicant>, AmbiguousIdentifier> {
    Ok(resolve_index(collection, identifier, policy)?.map(|index| &collection[index]))
}

/// E-mail first, then the first record with a matching name.
pub fn find_by_identifier<'a>(collection: &'a [Applicant], identifier: &str) -> Option<&'a Applicant> {
    collection
        .iter()
        .find(|applicant| applicant.matches_email(identifier))
        .or_else(|| {
            collection
                .iter()
                .find(|applicant| applicant.matches_name(identifier))
        })
}

pub fn filter_by_role<'a>(collection: &'a [Applicant], role: &str) -> Vec<&'a Applicant> {
    select(collection, |applicant| eq_folded(&applicant.role, role))
}

pub fn filter_by_location<'a>(collection: &'a [Applicant], location: &str) -> Vec<&'a Applicant> {
    select(collection, |applicant| eq_folded(&applicant.location, location))
}

pub fn filter_by_skill<'a>(collection: &'a [Applicant], skill: &str) -> Vec<&'a Applicant> {
    select(collection, |applicant| applicant.has_skill(skill))
}

pub fn filter_by_status<'a>(collection: &'a [Applicant], status: &str) -> Vec<&'a Applicant> {
    select(collection, |applicant| eq_folded(&applicant.status, status))
}

/// Inclusive on both ends.
pub fn filter_by_experience_range(
    collection: &[Applicant],
    min: u32,
    max: u32,
) -> Result<Vec<&Applicant>, ValidationError> {
    check_range("experience", u64::from(min), u64::from(max))?;
    Ok(select(collection, |applicant| {
        (min..=max).contains(&applicant.experience)
    }))
}

/// Inclusive on both ends.
pub fn filter_by_salary_range(
    collection: &[Applicant],
    min: u64,
    max: u64,
) -> Result<Vec<&Applicant>, ValidationError> {
    check_range("expected_salary", min, max)?;
    Ok(select(collection, |applicant| {
        (min..=max).contains(&applicant.expected_salary)
    }))
}

/// One of the supported filters, carried as a value so callers can dispatch
/// through a single code path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicantFilter {
    Role(String),
    Location(String),
    Skill(String),
    Status(String),
    Experience { min: u32, max: u32 },
    Salary { min: u64, max: u64 },
}

impl ApplicantFilter {
    pub fn apply<'a>(&self, collection: &'a [Applicant]) -> Result<Vec<&'a Applicant>, ValidationError> {
        match self {
            Self::Role(role) => Ok(filter_by_role(collection, role)),
            Self::Location(location) => Ok(filter_by_location(collection, location)),
            Self::Skill(skill) => Ok(filter_by_skill(collection, skill)),
            Self::Status(status) => Ok(filter_by_status(collection, status)),
            Self::Experience { min, max } => filter_by_experience_range(collection, *min, *max),
            Self::Salary { min, max } => filter_by_salary_range(collection, *min, *max),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Role(role) => format!("role '{role}'"),
            Self::Location(location) => format!("location '{location}'"),
            Self::Skill(skill) => format!("skill '{skill}'"),
            Self::Status(status) => format!("status '{status}'"),
            Self::Experience { min, max } => format!("experience {min}-{max} years"),
            Self::Salary { min, max } => format!("expected salary {min}-{max}"),
        }
    }
}

fn select<'a, F>(collection: &'a [Applicant], predicate: F) -> Vec<&'a Applicant>
where
    F: Fn(&Applicant) -> bool,
{
    collection
        .iter()
        .filter(|applicant| predicate(applicant))
        .collect()
}

fn check_range(field: &'static str, min: u64, max: u64) -> Result<(), ValidationError> {
    if min > max {
        return Err(ValidationError::InvalidRange { field, min, max });
    }
    Ok(())
}
