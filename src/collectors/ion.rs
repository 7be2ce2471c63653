//! Graphics allocation table collector.
//!
//! This module reads the system-wide ion vmalloc accounting table and
//! attributes graphics-buffer allocation sizes to their owning processes.
//! Format: one row per allocation: name, owner pid, size in bytes.

use std::fs;
use std::path::Path;

/// One row of the allocation table.
#[derive(Debug, Clone)]
pub struct AllocationEntry {
    pub name: String,
    pub owner_pid: u32,
    pub size: u64,
}

/// Parses one table row. The first three whitespace-separated tokens are
/// name, owner pid, and size; trailing tokens are ignored. Rows that do not
/// yield all three are skipped by the caller.
fn parse_allocation_line(line: &str) -> Option<AllocationEntry> {
    let mut parts = line.split_whitespace();
    let name = parts.next()?;
    let owner_pid = parts.next()?.parse().ok()?;
    let size = parts.next()?.parse().ok()?;

    Some(AllocationEntry {
        name: name.to_string(),
        owner_pid,
        size,
    })
}

/// Sums allocation sizes owned by `pid` in the table at `table_path`.
///
/// Unlike the smaps scan, an unopenable table is a propagated error: the
/// graphics category has no meaningful "no data" reading when the
/// system-wide ledger itself is missing.
pub fn scan_allocations(table_path: &Path, pid: u32) -> Result<u64, std::io::Error> {
    let content = fs::read_to_string(table_path)?;

    let mut total: u64 = 0;
    for line in content.lines() {
        if let Some(entry) = parse_allocation_line(line) {
            if entry.owner_pid == pid {
                total += entry.size;
            }
        }
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_table(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("vmalloc_ion");
        std::fs::write(&path, content).expect("Failed to write allocation table");
        (dir, path)
    }

    // -------------------------------------------------------------------------
    // Tests for parse_allocation_line
    // -------------------------------------------------------------------------

    #[test]
    fn test_parse_allocation_line() {
        let entry = parse_allocation_line("bufA 100 2048").expect("line should parse");
        assert_eq!(entry.name, "bufA");
        assert_eq!(entry.owner_pid, 100);
        assert_eq!(entry.size, 2048);
    }

    #[test]
    fn test_parse_allocation_line_extra_tokens() {
        // sscanf-style: trailing tokens do not invalidate the row
        let entry = parse_allocation_line("bufA 100 2048 extra junk").expect("line should parse");
        assert_eq!(entry.size, 2048);
    }

    #[test]
    fn test_parse_allocation_line_invalid() {
        assert!(parse_allocation_line("").is_none());
        assert!(parse_allocation_line("bufA").is_none());
        assert!(parse_allocation_line("bufA 100").is_none());
        assert!(parse_allocation_line("bufA pid 2048").is_none());
        assert!(parse_allocation_line("bufA 100 lots").is_none());
    }

    // -------------------------------------------------------------------------
    // Tests for scan_allocations
    // -------------------------------------------------------------------------

    #[test]
    fn test_scan_allocations_sums_matching_pid() {
        let (_dir, path) = write_table("bufA 100 2048\nbufB 200 4096\nbufC 100 1024\n");

        assert_eq!(scan_allocations(&path, 100).unwrap(), 3072);
        assert_eq!(scan_allocations(&path, 200).unwrap(), 4096);
        assert_eq!(scan_allocations(&path, 999).unwrap(), 0);
    }

    #[test]
    fn test_scan_allocations_skips_malformed_lines() {
        let (_dir, path) = write_table("client pid size\nbufA 100 2048\n\nbroken-line\nbufC 100 1024\n");

        assert_eq!(scan_allocations(&path, 100).unwrap(), 3072);
    }

    #[test]
    fn test_scan_allocations_missing_table_is_error() {
        let dir = tempdir().expect("Failed to create temp dir");
        let missing = dir.path().join("vmalloc_ion");

        assert!(scan_allocations(&missing, 100).is_err());
    }
}
