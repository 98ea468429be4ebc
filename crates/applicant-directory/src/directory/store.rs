use std::collections::HashMap;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::domain::Applicant;

/// Persistence boundary between the in-memory collection and its snapshot.
pub trait SnapshotStore: Send + Sync {
    fn load(&self) -> Result<Vec<Applicant>, StoreError>;
    fn save(&self, applicants: &[Applicant]) -> Result<(), StoreError>;
    /// Human readable location used in logs and messages.
    fn location(&self) -> String;
}

/// Single JSON file holding the whole collection as an array of records.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Applicant>, StoreError> {
        load(&self.path)
    }

    fn save(&self, applicants: &[Applicant]) -> Result<(), StoreError> {
        save(&self.path, applicants)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Reads the collection stored at `path`.
///
/// A missing file yields an empty collection so a fresh directory can be
/// bootstrapped. Unrecognized fields on a record are ignored. Records must
/// carry a name and an e-mail, and no two may share an e-mail.
pub fn load(path: &Path) -> Result<Vec<Applicant>, StoreError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "store file missing, starting empty");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(StoreError::Unreadable {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let applicants: Vec<Applicant> =
        serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;
    check_records(&applicants).map_err(|source| StoreError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(applicants)
}

fn check_records(applicants: &[Applicant]) -> Result<(), RecordViolation> {
    let mut seen: HashMap<String, usize> = HashMap::with_capacity(applicants.len());

    for (index, applicant) in applicants.iter().enumerate() {
        for (field, value) in [("name", &applicant.name), ("email", &applicant.email)] {
            if value.trim().is_empty() {
                return Err(RecordViolation::EmptyField { index, field });
            }
        }
        let key = applicant.identity_key();
        if let Some(&first) = seen.get(&key) {
            return Err(RecordViolation::DuplicateEmail {
                first,
                second: index,
                email: applicant.email.clone(),
            });
        }
        seen.insert(key, index);
    }

    Ok(())
}

/// Overwrites `path` with the full collection.
///
/// The snapshot is written to a temporary file in the same directory and
/// renamed over the target, so readers observe either the old or the new file.
pub fn save(path: &Path, applicants: &[Applicant]) -> Result<(), StoreError> {
    let persistence = |source: io::Error| StoreError::Persistence {
        path: path.to_path_buf(),
        source,
    };

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&directory).map_err(persistence)?;

    let mut staged = NamedTempFile::new_in(&directory).map_err(persistence)?;
    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, applicants)
            .map_err(|err| persistence(io::Error::from(err)))?;
        writer.write_all(b"\n").map_err(persistence)?;
        writer.flush().map_err(persistence)?;
    }
    // Staged files are created owner-only; keep whatever mode the store had.
    if let Ok(existing) = fs::metadata(path) {
        staged
            .as_file()
            .set_permissions(existing.permissions())
            .map_err(persistence)?;
    }
    staged.as_file().sync_all().map_err(persistence)?;
    staged.persist(path).map_err(|err| persistence(err.error))?;

    tracing::debug!(path = %path.display(), records = applicants.len(), "store saved");
    Ok(())
}

/// Failure reading or writing the stored collection.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unable to read applicant store {}: {source}", path.display())]
    Unreadable { path: PathBuf, source: io::Error },
    #[error("applicant store {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("applicant store {} holds an invalid record: {source}", path.display())]
    Invalid {
        path: PathBuf,
        source: RecordViolation,
    },
    #[error("unable to persist applicant store {}: {source}", path.display())]
    Persistence { path: PathBuf, source: io::Error },
}

/// A stored record that breaks the directory's invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordViolation {
    #[error("record {index} has an empty {field}")]
    EmptyField { index: usize, field: &'static str },
    #[error("records {first} and {second} share email '{email}'")]
    DuplicateEmail {
        first: usize,
        second: usize,
        email: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::tests::common::{ada, grace};

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loaded = load(&dir.path().join("absent.json")).expect("missing file is not an error");
        assert!(loaded.is_empty());
    }

    #[test]
    fn round_trip_preserves_order_and_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("applicants.json");
        let collection = vec![grace(), ada()];

        save(&path, &collection).expect("save succeeds");
        let loaded = load(&path).expect("load succeeds");

        assert_eq!(loaded, collection);
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("store.json");

        save(&path, &[ada()]).expect("save succeeds");
        assert_eq!(load(&path).expect("load succeeds").len(), 1);
    }

    #[test]
    fn unparseable_file_reports_corrupt_store_with_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").expect("write fixture");

        match load(&path) {
            Err(StoreError::Corrupt { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected corrupt store error, got {other:?}"),
        }
    }

    #[test]
    fn negative_numbers_on_disk_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("negative.json");
        let document = serde_json::json!([{
            "name": "Ada",
            "email": "ada@x.com",
            "role": "Engineer",
            "location": "NY",
            "skills": [],
            "experience": -1,
            "expected_salary": 10,
            "status": "Applied"
        }]);
        fs::write(&path, document.to_string()).expect("write fixture");

        assert!(matches!(load(&path), Err(StoreError::Corrupt { .. })));
    }

    fn record(name: &str, email: &str) -> serde_json::Value {
        serde_json::json!({
            "name": name,
            "email": email,
            "role": "Engineer",
            "location": "NY",
            "skills": [],
            "experience": 1,
            "expected_salary": 10,
            "status": "Applied"
        })
    }

    #[test]
    fn duplicate_emails_on_disk_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("duplicates.json");
        let document = serde_json::json!([record("Ada", "a@x.com"), record("Eve", "A@X.COM")]);
        fs::write(&path, document.to_string()).expect("write fixture");

        match load(&path) {
            Err(StoreError::Invalid {
                path: reported,
                source,
            }) => {
                assert_eq!(reported, path);
                assert_eq!(
                    source,
                    RecordViolation::DuplicateEmail {
                        first: 0,
                        second: 1,
                        email: "A@X.COM".to_string(),
                    }
                );
            }
            other => panic!("expected invalid store error, got {other:?}"),
        }
    }

    #[test]
    fn blank_name_on_disk_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("blank.json");
        let document = serde_json::json!([record("Ada", "ada@x.com"), record("  ", "b@x.com")]);
        fs::write(&path, document.to_string()).expect("write fixture");

        assert!(matches!(
            load(&path),
            Err(StoreError::Invalid {
                source: RecordViolation::EmptyField {
                    index: 1,
                    field: "name"
                },
                ..
            })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn save_keeps_existing_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("applicants.json");
        fs::write(&path, "[]").expect("write fixture");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).expect("chmod");

        save(&path, &[ada()]).expect("save succeeds");

        let mode = fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
        assert_eq!(load(&path).expect("load succeeds"), vec![ada()]);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("extra.json");
        let document = serde_json::json!([{
            "name": "Ada",
            "email": "ada@x.com",
            "role": "Engineer",
            "location": "NY",
            "skills": ["Go"],
            "experience": 5,
            "expected_salary": 120000,
            "status": "Applied",
            "referral": "conference"
        }]);
        fs::write(&path, document.to_string()).expect("write fixture");

        let loaded = load(&path).expect("extra fields tolerated");
        assert_eq!(loaded[0].skills, vec!["Go"]);
    }

    #[test]
    fn save_into_unwritable_location_reports_persistence_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").expect("write fixture");
        let path = blocker.join("store.json");

        assert!(matches!(
            save(&path, &[ada()]),
            Err(StoreError::Persistence { .. })
        ));
    }
}
