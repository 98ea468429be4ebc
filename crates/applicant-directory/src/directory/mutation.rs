//! Collection-level mutations. None of these touch the store; persisting the
//! result is up to the caller.

use super::domain::Applicant;
use super::query::{resolve_index, AmbiguousIdentifier, IdentifierPolicy};

/// Appends `candidate` unless its e-mail is already taken.
///
/// Returns the new collection together with the stored record.
pub fn add(
    collection: &[Applicant],
    candidate: Applicant,
) -> Result<(Vec<Applicant>, Applicant), MutationError> {
    ensure_unique(collection, &candidate.email)?;

    let mut updated = Vec::with_capacity(collection.len() + 1);
    updated.extend_from_slice(collection);
    updated.push(candidate.clone());
    Ok((updated, candidate))
}

/// In-place variant of [`add`] for callers already working on a copy.
pub fn append(
    collection: &mut Vec<Applicant>,
    candidate: Applicant,
) -> Result<Applicant, MutationError> {
    ensure_unique(collection, &candidate.email)?;
    collection.push(candidate.clone());
    Ok(candidate)
}

fn ensure_unique(collection: &[Applicant], email: &str) -> Result<(), MutationError> {
    if collection.iter().any(|existing| existing.matches_email(email)) {
        return Err(MutationError::DuplicateEmail {
            email: email.to_string(),
        });
    }
    Ok(())
}

/// Replaces the status of the record `identifier` resolves to, in place.
///
/// Any status may replace any other.
pub fn update_status(
    collection: &mut [Applicant],
    identifier: &str,
    status: &str,
    policy: IdentifierPolicy,
) -> Result<Applicant, MutationError> {
    let index = resolve_index(collection, identifier, policy)?.ok_or_else(|| {
        MutationError::NotFound {
            identifier: identifier.to_string(),
        }
    })?;

    let applicant = &mut collection[index];
    applicant.status = status.trim().to_string();
    Ok(applicant.clone())
}

/// Drops every record whose e-mail or name matches `identifier`.
///
/// A count of zero means nothing matched; the returned collection is then an
/// unchanged copy.
pub fn delete(collection: &[Applicant], identifier: &str) -> (Vec<Applicant>, usize) {
    let retained: Vec<Applicant> = collection
        .iter()
        .filter(|applicant| {
            !(applicant.matches_email(identifier) || applicant.matches_name(identifier))
        })
        .cloned()
        .collect();
    let removed = collection.len() - retained.len();
    (retained, removed)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    #[error("an applicant with email '{email}' already exists")]
    DuplicateEmail { email: String },
    #[error("no applicant matches '{identifier}'")]
    NotFound { identifier: String },
    #[error(transparent)]
    Ambiguous(#[from] AmbiguousIdentifier),
}
