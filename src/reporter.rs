//! Memory report assembly per category.
//!
//! [`Memtrack`] is the query surface consumed by the memory-reporting
//! service: one synchronous call per pid and category, returning a small
//! fixed set of classified records.

use crate::collectors::ion;
use crate::config::MemtrackConfig;
use crate::error::MemtrackError;
use crate::process::{gpu, identity};
use crate::record::MemoryRecord;
use tracing::debug;

/// Memory category selecting which accounting source to consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// GPU-driver device mappings, derived from the process's smaps.
    Gl,
    /// Graphics-buffer allocations from the system-wide allocator table.
    Graphics,
}

impl Category {
    /// Wire value of this category as used by the consuming service.
    pub fn as_raw(self) -> i32 {
        match self {
            Category::Gl => 0,
            Category::Graphics => 1,
        }
    }
}

impl TryFrom<i32> for Category {
    type Error = MemtrackError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Category::Gl),
            1 => Ok(Category::Graphics),
            other => Err(MemtrackError::InvalidArgument(other)),
        }
    }
}

/// A filled record set plus the true record count.
///
/// `records` is truncated to the capacity the caller asked for;
/// `total_records` always reports how many records a full-capacity query
/// would return, so callers can probe first and allocate second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryReport {
    pub records: Vec<MemoryRecord>,
    pub total_records: usize,
}

/// Per-process memory accounting over the proc filesystem.
///
/// Each query opens and fully consumes its own file handles; there is no
/// shared mutable state between calls, so repeated queries over identical
/// on-disk tables produce identical reports.
pub struct Memtrack {
    config: MemtrackConfig,
}

impl Memtrack {
    pub fn new(config: MemtrackConfig) -> Self {
        Self { config }
    }

    /// No-op initialization hook kept for the module contract with the
    /// consuming service.
    pub fn init(&self) -> Result<(), MemtrackError> {
        debug!("memtrack initialized ({} record templates)", self.config.record_templates.len());
        Ok(())
    }

    /// Reports memory usage of `pid` for `category`.
    ///
    /// At most `capacity` records are filled from the configured templates;
    /// `capacity == 0` is the probe mode: it returns the record count
    /// without touching any table.
    pub fn get_memory(
        &self,
        pid: u32,
        category: Category,
        capacity: usize,
    ) -> Result<MemoryReport, MemtrackError> {
        let templates = &self.config.record_templates;
        let total_records = templates.len();
        let mut records: Vec<MemoryRecord> = templates.iter().take(capacity).copied().collect();

        if records.is_empty() {
            return Ok(MemoryReport {
                records,
                total_records,
            });
        }

        let unaccounted_size = match category {
            Category::Gl => {
                let proc_path = self.config.proc_root.join(pid.to_string());
                // Only non-privileged processes are accounted per-process
                let uid = identity::resolve_owner_uid(&proc_path).map_err(|e| {
                    debug!("uid resolution for pid {} failed: {}", pid, e);
                    MemtrackError::AccessDenied { pid }
                })?;
                if uid == 0 {
                    return Err(MemtrackError::AccessDenied { pid });
                }
                gpu::scan_gpu_mappings(&proc_path, &self.config)
            }
            Category::Graphics => ion::scan_allocations(&self.config.ion_table_path, pid)?,
        };

        records[0].size_in_bytes = unaccounted_size;

        Ok(MemoryReport {
            records,
            total_records,
        })
    }

    /// Validation layer over [`get_memory`](Self::get_memory) for raw
    /// category values. Unsupported values fail before any table is opened.
    pub fn get_memory_raw(
        &self,
        pid: u32,
        raw_category: i32,
        capacity: usize,
    ) -> Result<MemoryReport, MemtrackError> {
        let category = Category::try_from(raw_category)?;
        self.get_memory(pid, category, capacity)
    }
}

impl Default for Memtrack {
    fn default() -> Self {
        Self::new(MemtrackConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        assert_eq!(Category::try_from(0).unwrap(), Category::Gl);
        assert_eq!(Category::try_from(1).unwrap(), Category::Graphics);
        assert_eq!(Category::Gl.as_raw(), 0);
        assert_eq!(Category::Graphics.as_raw(), 1);
    }

    #[test]
    fn test_category_rejects_unknown_values() {
        for raw in [-1, 2, 3, i32::MAX] {
            match Category::try_from(raw) {
                Err(MemtrackError::InvalidArgument(v)) => assert_eq!(v, raw),
                other => panic!("expected InvalidArgument, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_init_is_noop() {
        let tracker = Memtrack::default();
        assert!(tracker.init().is_ok());
    }
}
