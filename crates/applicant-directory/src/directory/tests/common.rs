use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::directory::domain::Applicant;
use crate::directory::service::{OperationEvent, OperationObserver};
use crate::directory::store::{SnapshotStore, StoreError};

#[allow(clippy::too_many_arguments)]
pub(crate) fn applicant(
    name: &str,
    email: &str,
    role: &str,
    location: &str,
    skills: &[&str],
    experience: u32,
    expected_salary: u64,
    status: &str,
) -> Applicant {
    Applicant::new(
        name,
        email,
        role,
        location,
        skills.iter().map(|skill| skill.to_string()).collect(),
        experience,
        expected_salary,
        status,
    )
    .expect("fixture applicant is valid")
}

pub(crate) fn ada() -> Applicant {
    applicant(
        "Ada",
        "ada@x.com",
        "Engineer",
        "NY",
        &["Go", "Rust"],
        5,
        120_000,
        "Applied",
    )
}

pub(crate) fn grace() -> Applicant {
    applicant(
        "Grace",
        "grace@x.com",
        "Manager",
        "SF",
        &["COBOL", "Leadership"],
        12,
        150_000,
        "Interviewing",
    )
}

pub(crate) fn linus() -> Applicant {
    applicant(
        "Linus",
        "linus@x.com",
        "engineer",
        "ny",
        &["C", "Git", "c"],
        8,
        100_000,
        "Hired",
    )
}

pub(crate) fn roster() -> Vec<Applicant> {
    vec![ada(), grace(), linus()]
}

/// Store keeping snapshots in memory and counting writes.
#[derive(Default)]
pub(crate) struct MemoryStore {
    snapshot: Mutex<Vec<Applicant>>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub(crate) fn with(applicants: Vec<Applicant>) -> Self {
        Self {
            snapshot: Mutex::new(applicants),
            saves: AtomicUsize::new(0),
        }
    }

    pub(crate) fn snapshot(&self) -> Vec<Applicant> {
        self.snapshot.lock().expect("store mutex poisoned").clone()
    }

    pub(crate) fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Vec<Applicant>, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, applicants: &[Applicant]) -> Result<(), StoreError> {
        *self.snapshot.lock().expect("store mutex poisoned") = applicants.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

/// Store that loads a fixed collection and refuses every save.
pub(crate) struct FailingStore {
    initial: Vec<Applicant>,
}

impl FailingStore {
    pub(crate) fn with(initial: Vec<Applicant>) -> Self {
        Self { initial }
    }
}

impl SnapshotStore for FailingStore {
    fn load(&self) -> Result<Vec<Applicant>, StoreError> {
        Ok(self.initial.clone())
    }

    fn save(&self, _applicants: &[Applicant]) -> Result<(), StoreError> {
        Err(StoreError::Persistence {
            path: "read-only.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read only"),
        })
    }

    fn location(&self) -> String {
        "read-only.json".to_string()
    }
}

#[derive(Default)]
pub(crate) struct RecordingObserver {
    events: Mutex<Vec<OperationEvent>>,
}

impl OperationObserver for RecordingObserver {
    fn observe(&self, event: OperationEvent) {
        self.events.lock().expect("observer mutex poisoned").push(event);
    }
}

impl RecordingObserver {
    pub(crate) fn events(&self) -> Vec<OperationEvent> {
        self.events.lock().expect("observer mutex poisoned").clone()
    }
}
