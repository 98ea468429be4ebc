use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use super::aggregation::{self, CountAttribute, NumericAttribute};
use super::domain::{Applicant, ApplicantSubmission, ValidationError};
use super::import::{self, ImportError, ImportSummary, SkippedRow};
use super::mutation::{self, MutationError};
use super::query::{self, AmbiguousIdentifier, ApplicantFilter, IdentifierPolicy};
use super::store::{SnapshotStore, StoreError};

/// Directory facade composing the store, the collection it owns, and the
/// observer notified about every operation.
///
/// Mutations are applied to a copy of the collection which only replaces the
/// canonical one after the store accepted the new snapshot.
pub struct ApplicantDirectory<S, O> {
    store: Arc<S>,
    observer: Arc<O>,
    policy: IdentifierPolicy,
    applicants: Vec<Applicant>,
}

impl<S, O> ApplicantDirectory<S, O>
where
    S: SnapshotStore + 'static,
    O: OperationObserver + 'static,
{
    /// Loads the collection from `store`.
    pub fn open(
        store: Arc<S>,
        observer: Arc<O>,
        policy: IdentifierPolicy,
    ) -> Result<Self, DirectoryError> {
        let loaded = store.load().map_err(DirectoryError::from);
        let outcome = OperationOutcome::from_result(&loaded);
        observer.observe(OperationEvent {
            operation: Operation::Load,
            outcome,
        });

        Ok(Self {
            store,
            observer,
            policy,
            applicants: loaded?,
        })
    }

    pub fn applicants(&self) -> &[Applicant] {
        &self.applicants
    }

    pub fn len(&self) -> usize {
        self.applicants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applicants.is_empty()
    }

    pub fn policy(&self) -> IdentifierPolicy {
        self.policy
    }

    pub fn store_location(&self) -> String {
        self.store.location()
    }

    /// Looks an applicant up by e-mail, falling back to name per the policy.
    pub fn find(&self, identifier: &str) -> Result<Option<&Applicant>, DirectoryError> {
        let result = query::resolve_identifier(&self.applicants, identifier, self.policy)
            .map_err(DirectoryError::from);
        self.observe(Operation::Find, result)
    }

    pub fn filter(&self, filter: &ApplicantFilter) -> Result<Vec<&Applicant>, DirectoryError> {
        let result = filter
            .apply(&self.applicants)
            .map_err(DirectoryError::from);
        self.observe(Operation::Filter, result)
    }

    pub fn count_by(&self, attribute: CountAttribute) -> BTreeMap<String, usize> {
        let counts = aggregation::count_by_attribute(&self.applicants, attribute);
        self.notify(Operation::Count, OperationOutcome::Completed);
        counts
    }

    pub fn average_by_role(&self, attribute: NumericAttribute) -> BTreeMap<String, f64> {
        let averages = aggregation::average_by_role(&self.applicants, attribute);
        self.notify(Operation::Average, OperationOutcome::Completed);
        averages
    }

    /// Adds a validated applicant and persists the collection.
    pub fn add(&mut self, candidate: Applicant) -> Result<Applicant, DirectoryError> {
        let result = self.try_add(candidate);
        self.observe(Operation::Add, result)
    }

    /// Validates raw input and adds the resulting applicant.
    pub fn add_submission(
        &mut self,
        submission: ApplicantSubmission,
    ) -> Result<Applicant, DirectoryError> {
        let result = submission
            .into_applicant()
            .map_err(DirectoryError::from)
            .and_then(|candidate| self.try_add(candidate));
        self.observe(Operation::Add, result)
    }

    pub fn update_status(
        &mut self,
        identifier: &str,
        status: &str,
    ) -> Result<Applicant, DirectoryError> {
        let result = self.try_update_status(identifier, status);
        self.observe(Operation::UpdateStatus, result)
    }

    /// Removes every applicant matching `identifier` by e-mail or name and
    /// returns how many were removed. Nothing is written when nothing matched.
    pub fn delete(&mut self, identifier: &str) -> Result<usize, DirectoryError> {
        let result = self.try_delete(identifier);
        self.observe(Operation::Delete, result)
    }

    /// Imports applicants from CSV, applying the same checks as [`Self::add`].
    ///
    /// Rows that cannot be read, fail validation, or clash with an existing
    /// e-mail are skipped and reported. The store is written once if anything was added.
    pub fn import_csv<R: Read>(&mut self, reader: R) -> Result<ImportSummary, ImportError> {
        let rows = import::parse_rows(reader)?;
        let mut working = self.applicants.clone();
        let mut summary = ImportSummary::default();

        for row in rows {
            let admitted = row.submission.and_then(|submission| {
                submission
                    .into_applicant()
                    .map_err(DirectoryError::from)
                    .and_then(|candidate| {
                        mutation::append(&mut working, candidate).map_err(DirectoryError::from)
                    })
                    .map_err(|err| err.to_string())
            });

            match admitted {
                Ok(_) => summary.added += 1,
                Err(reason) => {
                    tracing::debug!(line = row.line, %reason, "skipping import row");
                    summary.skipped.push(SkippedRow {
                        line: row.line,
                        reason,
                    });
                }
            }
        }

        let result = if summary.added > 0 {
            self.commit(working).map_err(DirectoryError::from)
        } else {
            Ok(())
        };
        self.observe(Operation::Import, result)?;

        Ok(summary)
    }

    /// Opens `path` and imports it with [`Self::import_csv`].
    pub fn import_csv_path<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> Result<ImportSummary, ImportError> {
        let file = std::fs::File::open(path)?;
        self.import_csv(file)
    }

    fn try_add(&mut self, candidate: Applicant) -> Result<Applicant, DirectoryError> {
        let (updated, stored) = mutation::add(&self.applicants, candidate)?;
        self.commit(updated)?;
        Ok(stored)
    }

    fn try_update_status(
        &mut self,
        identifier: &str,
        status: &str,
    ) -> Result<Applicant, DirectoryError> {
        let mut updated = self.applicants.clone();
        let applicant = mutation::update_status(&mut updated, identifier, status, self.policy)?;
        self.commit(updated)?;
        Ok(applicant)
    }

    fn try_delete(&mut self, identifier: &str) -> Result<usize, DirectoryError> {
        let (updated, removed) = mutation::delete(&self.applicants, identifier);
        if removed > 0 {
            self.commit(updated)?;
        }
        Ok(removed)
    }

    fn commit(&mut self, updated: Vec<Applicant>) -> Result<(), StoreError> {
        self.store.save(&updated)?;
        self.applicants = updated;
        Ok(())
    }

    fn observe<T>(
        &self,
        operation: Operation,
        result: Result<T, DirectoryError>,
    ) -> Result<T, DirectoryError> {
        self.notify(operation, OperationOutcome::from_result(&result));
        result
    }

    fn notify(&self, operation: Operation, outcome: OperationOutcome) {
        self.observer.observe(OperationEvent { operation, outcome });
    }
}

/// Operations reported to an [`OperationObserver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Load,
    Find,
    Filter,
    Count,
    Average,
    Add,
    UpdateStatus,
    Delete,
    Import,
}

impl Operation {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Find => "find",
            Self::Filter => "filter",
            Self::Count => "count",
            Self::Average => "average",
            Self::Add => "add",
            Self::UpdateStatus => "update_status",
            Self::Delete => "delete",
            Self::Import => "import",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    Completed,
    /// The request was refused and nothing changed.
    Rejected(String),
    /// The store could not be read or written.
    Failed(String),
}

impl OperationOutcome {
    fn from_result<T>(result: &Result<T, DirectoryError>) -> Self {
        match result {
            Ok(_) => Self::Completed,
            Err(err) => Self::from_error(err),
        }
    }

    fn from_error(err: &DirectoryError) -> Self {
        if err.is_rejection() {
            Self::Rejected(err.to_string())
        } else {
            Self::Failed(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationEvent {
    pub operation: Operation,
    pub outcome: OperationOutcome,
}

/// Receives one event per directory call, replacing implicit global logging.
pub trait OperationObserver: Send + Sync {
    fn observe(&self, event: OperationEvent);
}

/// Forwards operation events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl OperationObserver for TracingObserver {
    fn observe(&self, event: OperationEvent) {
        let operation = event.operation.label();
        match event.outcome {
            OperationOutcome::Completed => tracing::info!(operation, "operation completed"),
            OperationOutcome::Rejected(reason) => {
                tracing::warn!(operation, %reason, "operation rejected")
            }
            OperationOutcome::Failed(reason) => {
                tracing::error!(operation, %reason, "operation failed")
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl OperationObserver for NoopObserver {
    fn observe(&self, _event: OperationEvent) {}
}

/// Error raised by the directory service.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("an applicant with email '{email}' already exists")]
    DuplicateEmail { email: String },
    #[error("no applicant matches '{identifier}'")]
    NotFound { identifier: String },
    #[error(transparent)]
    AmbiguousIdentifier(#[from] AmbiguousIdentifier),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DirectoryError {
    /// True for refusals that leave the directory untouched and are safe to
    /// report and move past; false for storage failures.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

impl From<MutationError> for DirectoryError {
    fn from(value: MutationError) -> Self {
        match value {
            MutationError::DuplicateEmail { email } => Self::DuplicateEmail { email },
            MutationError::NotFound { identifier } => Self::NotFound { identifier },
            MutationError::Ambiguous(err) => Self::AmbiguousIdentifier(err),
        }
    }
}
