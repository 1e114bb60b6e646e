//! File checks evaluated after the process exits

use std::fmt;
use std::path::PathBuf;
use crate::spec::{Expectation, FileCheck};

/// Why a file check did not pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Expected to be missing, but exists
    Exists,
    /// Expected to be present, but missing
    Missing,
    /// Present, but holds these contents instead
    WrongContents(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Exists => write!(f, "file exists"),
            FailureReason::Missing => write!(f, "file doesn't exist"),
            FailureReason::WrongContents(actual) => write!(f, "wrong contents: {:?}", actual),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedCheck {
    pub path: PathBuf,
    pub reason: FailureReason,
}

impl fmt::Display for FailedCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}

/// Evaluate every check independently and collect all failures in order.
pub fn check_files(checks: &[FileCheck]) -> Vec<FailedCheck> {
    checks.iter()
        .filter_map(|check| {
            check_one(check).map(|reason| FailedCheck {
                path: check.path.clone(),
                reason,
            })
        })
        .collect()
}

fn check_one(check: &FileCheck) -> Option<FailureReason> {
    let exists = check.path.exists();
    match &check.expectation {
        Expectation::MustNotExist => exists.then_some(FailureReason::Exists),
        Expectation::MustExist => (!exists).then_some(FailureReason::Missing),
        Expectation::Contents(expected) => {
            if !exists {
                return Some(FailureReason::Missing);
            }
            match std::fs::read(&check.path) {
                Ok(actual) if actual == expected.as_bytes() => None,
                Ok(actual) => Some(FailureReason::WrongContents(
                    String::from_utf8_lossy(&actual).into_owned(),
                )),
                // Exists but unreadable as a file (a directory, for one)
                Err(e) => Some(FailureReason::WrongContents(format!("<unreadable: {}>", e))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn check(path: PathBuf, expectation: Expectation) -> FileCheck {
        FileCheck { path, expectation }
    }

    #[test]
    fn test_existence_checks() {
        let tmp = TempDir::new().unwrap();
        let present = tmp.path().join("present");
        let absent = tmp.path().join("absent");
        std::fs::write(&present, "x").unwrap();

        let checks = vec![
            check(present.clone(), Expectation::MustExist),
            check(absent.clone(), Expectation::MustNotExist),
            check(present.clone(), Expectation::MustNotExist),
            check(absent.clone(), Expectation::MustExist),
        ];
        let failed = check_files(&checks);
        assert_eq!(failed, vec![
            FailedCheck { path: present, reason: FailureReason::Exists },
            FailedCheck { path: absent, reason: FailureReason::Missing },
        ]);
    }

    #[test]
    fn test_contents_exact_match() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("f.txt");
        std::fs::write(&path, "line\r\n").unwrap();

        assert!(check_files(&[check(path.clone(), "line\r\n".into())]).is_empty());

        let failed = check_files(&[check(path.clone(), "line\n".into())]);
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].reason, FailureReason::WrongContents("line\r\n".into()));
    }

    #[test]
    fn test_contents_missing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.txt");
        let failed = check_files(&[check(path.clone(), "expected text".into())]);
        assert_eq!(failed, vec![FailedCheck { path, reason: FailureReason::Missing }]);
        assert_eq!(failed[0].reason.to_string(), "file doesn't exist");
    }

    #[test]
    fn test_duplicates_reported_independently() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dup");
        let checks = vec![
            check(path.clone(), Expectation::MustExist),
            check(path.clone(), Expectation::MustExist),
        ];
        assert_eq!(check_files(&checks).len(), 2);
        std::fs::write(&path, "").unwrap();
        assert!(check_files(&checks).is_empty());
    }
}
