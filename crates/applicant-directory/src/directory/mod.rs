//! Applicant directory: record model, JSON store, queries, aggregations, and
//! the mutation service tying them together.

pub mod aggregation;
pub mod domain;
pub mod import;
pub mod mutation;
pub mod query;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use aggregation::{average_by_role, count_by_attribute, CountAttribute, NumericAttribute};
pub use domain::{parse_skills, Applicant, ApplicantSubmission, ValidationError};
pub use import::{ImportError, ImportSummary, SkippedRow};
pub use mutation::MutationError;
pub use query::{find_by_identifier, AmbiguousIdentifier, ApplicantFilter, IdentifierPolicy};
pub use service::{
    ApplicantDirectory, DirectoryError, NoopObserver, Operation, OperationEvent,
    OperationObserver, OperationOutcome, TracingObserver,
};
pub use store::{JsonFileStore, RecordViolation, SnapshotStore, StoreError};
