use std::collections::BTreeMap;
use std::io::{self, Write};

use applicant_directory::directory::{
    Applicant, CountAttribute, ImportSummary, NumericAttribute,
};

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub(crate) fn from_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Text
        }
    }
}

pub(crate) fn applicant_list<W: Write>(
    out: &mut W,
    applicants: &[&Applicant],
    format: OutputFormat,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        return json(out, &applicants);
    }

    if applicants.is_empty() {
        return writeln!(out, "No applicants found.");
    }

    for applicant in applicants {
        writeln!(
            out,
            "Name: {} | Email: {} | Role: {} | Experience: {} yrs | Status: {}",
            applicant.name,
            applicant.email,
            applicant.role,
            applicant.experience,
            applicant.status
        )?;
    }
    Ok(())
}

pub(crate) fn applicant_detail<W: Write>(
    out: &mut W,
    applicant: Option<&Applicant>,
    identifier: &str,
    format: OutputFormat,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        return json(out, &applicant);
    }

    let Some(applicant) = applicant else {
        return writeln!(out, "No applicant matches '{identifier}'.");
    };

    writeln!(out, "Name:            {}", applicant.name)?;
    writeln!(out, "Email:           {}", applicant.email)?;
    writeln!(out, "Role:            {}", applicant.role)?;
    writeln!(out, "Location:        {}", applicant.location)?;
    writeln!(out, "Skills:          {}", applicant.skills.join(", "))?;
    writeln!(out, "Experience:      {} yrs", applicant.experience)?;
    writeln!(out, "Expected Salary: {}", applicant.expected_salary)?;
    writeln!(out, "Status:          {}", applicant.status)
}

pub(crate) fn counts<W: Write>(
    out: &mut W,
    attribute: CountAttribute,
    counts: &BTreeMap<String, usize>,
    format: OutputFormat,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        return json(out, counts);
    }

    writeln!(out, "Applicant count by {}:", attribute.label())?;
    if counts.is_empty() {
        return writeln!(out, "  (no applicants)");
    }
    for (value, count) in counts {
        writeln!(out, "  {}: {}", display_value(value), count)?;
    }
    Ok(())
}

/// Averages are rounded to two decimals here and nowhere else.
pub(crate) fn averages<W: Write>(
    out: &mut W,
    attribute: NumericAttribute,
    averages: &BTreeMap<String, f64>,
    format: OutputFormat,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        return json(out, averages);
    }

    writeln!(out, "Average {} by Role:", attribute.label())?;
    if averages.is_empty() {
        return writeln!(out, "  (no applicants)");
    }
    for (role, average) in averages {
        writeln!(out, "  {}: {:.2}", display_value(role), average)?;
    }
    Ok(())
}

pub(crate) fn import_summary<W: Write>(
    out: &mut W,
    summary: &ImportSummary,
    format: OutputFormat,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        return json(out, summary);
    }

    writeln!(
        out,
        "Imported {} applicant(s), skipped {} row(s).",
        summary.added,
        summary.skipped.len()
    )?;
    for row in &summary.skipped {
        writeln!(out, "  line {}: {}", row.line, row.reason)?;
    }
    Ok(())
}

fn display_value(value: &str) -> &str {
    if value.is_empty() {
        "(blank)"
    } else {
        value
    }
}

fn json<W: Write, T: serde::Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}
