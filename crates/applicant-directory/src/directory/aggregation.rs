use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::domain::Applicant;

/// Attributes the directory can be grouped and counted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountAttribute {
    Role,
    Location,
    Status,
    Skills,
}

impl CountAttribute {
    pub const fn ordered() -> [Self; 4] {
        [Self::Role, Self::Location, Self::Status, Self::Skills]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Role => "Role",
            Self::Location => "Location",
            Self::Status => "Status",
            Self::Skills => "Skill",
        }
    }

    /// Values a single applicant contributes to the count.
    fn values(self, applicant: &Applicant) -> &[String] {
        match self {
            Self::Role => std::slice::from_ref(&applicant.role),
            Self::Location => std::slice::from_ref(&applicant.location),
            Self::Status => std::slice::from_ref(&applicant.status),
            Self::Skills => &applicant.skills,
        }
    }
}

impl FromStr for CountAttribute {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "role" => Ok(Self::Role),
            "location" => Ok(Self::Location),
            "status" => Ok(Self::Status),
            "skill" | "skills" => Ok(Self::Skills),
            other => Err(format!(
                "cannot count by '{other}' (expected role, location, status or skill)"
            )),
        }
    }
}

impl fmt::Display for CountAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Numeric attributes that can be averaged per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericAttribute {
    Experience,
    ExpectedSalary,
}

impl NumericAttribute {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Experience => "Experience",
            Self::ExpectedSalary => "Expected Salary",
        }
    }

    fn value(self, applicant: &Applicant) -> f64 {
        match self {
            Self::Experience => f64::from(applicant.experience),
            Self::ExpectedSalary => applicant.expected_salary as f64,
        }
    }
}

impl FromStr for NumericAttribute {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "experience" => Ok(Self::Experience),
            "salary" | "expected_salary" | "expected-salary" => Ok(Self::ExpectedSalary),
            other => Err(format!(
                "cannot average '{other}' (expected experience or salary)"
            )),
        }
    }
}

impl fmt::Display for NumericAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Counts stored values of `attribute` exactly as written (case-sensitive).
///
/// For [`CountAttribute::Skills`] every listed skill counts once per entry,
/// so a record listing a skill twice contributes two.
pub fn count_by_attribute(
    collection: &[Applicant],
    attribute: CountAttribute,
) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for applicant in collection {
        for value in attribute.values(applicant) {
            *counts.entry(value.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Arithmetic mean of `attribute` per role. Only roles present are keyed and
/// results are not rounded.
pub fn average_by_role(
    collection: &[Applicant],
    attribute: NumericAttribute,
) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for applicant in collection {
        let entry = totals.entry(applicant.role.as_str()).or_insert((0.0, 0));
        entry.0 += attribute.value(applicant);
        entry.1 += 1;
    }

    totals
        .into_iter()
        .map(|(role, (sum, members))| (role.to_string(), sum / members as f64))
        .collect()
}
