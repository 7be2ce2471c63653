//! Process identity resolution from /proc.
//!
//! Reads the owning uid of a process from `/proc/<pid>/status`. The reporter
//! uses this as an access-control gate: processes running as the privileged
//! identity are excluded from per-process accounting.

use std::fs;
use std::path::Path;

/// Reads the owning (real) uid from `<proc_path>/status`.
///
/// The status file carries four uid columns (real, effective, saved,
/// filesystem); only the first is consulted. Returns a NotFound error if the
/// file cannot be read or contains no parseable `Uid:` line.
pub fn resolve_owner_uid(proc_path: &Path) -> Result<u32, std::io::Error> {
    let status_path = proc_path.join("status");
    let content = fs::read_to_string(status_path)?;

    for line in content.lines() {
        if let Some(v) = line.strip_prefix("Uid:") {
            if let Some(uid) = v.split_whitespace().next().and_then(|t| t.parse().ok()) {
                return Ok(uid);
            }
        }
    }

    Err(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        "no Uid line in status file",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_owner_uid() {
        let dir = tempdir().expect("Failed to create temp dir");
        let status_content = "Name:\tcat\nState:\tR (running)\nPid:\t1234\nUid:\t1000\t1000\t1000\t1000\nGid:\t1000\t1000\t1000\t1000\n";
        std::fs::write(dir.path().join("status"), status_content)
            .expect("Failed to write status file");

        assert_eq!(resolve_owner_uid(dir.path()).unwrap(), 1000);
    }

    #[test]
    fn test_resolve_owner_uid_takes_real_uid_column() {
        let dir = tempdir().expect("Failed to create temp dir");
        // Real uid differs from effective/saved/fs uids (setuid binary)
        let status_content = "Name:\tpasswd\nUid:\t1000\t0\t0\t0\n";
        std::fs::write(dir.path().join("status"), status_content)
            .expect("Failed to write status file");

        assert_eq!(resolve_owner_uid(dir.path()).unwrap(), 1000);
    }

    #[test]
    fn test_resolve_owner_uid_root() {
        let dir = tempdir().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("status"), "Name:\tinit\nUid:\t0\t0\t0\t0\n")
            .expect("Failed to write status file");

        assert_eq!(resolve_owner_uid(dir.path()).unwrap(), 0);
    }

    #[test]
    fn test_resolve_owner_uid_missing_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        assert!(resolve_owner_uid(dir.path()).is_err());
    }

    #[test]
    fn test_resolve_owner_uid_no_uid_line() {
        let dir = tempdir().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("status"), "Name:\tcat\nState:\tR (running)\n")
            .expect("Failed to write status file");

        let err = resolve_owner_uid(dir.path()).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
