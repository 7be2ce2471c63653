//! Memory record types shared between the reporter and its callers.

use serde::{Deserialize, Serialize};

/// Record flag bits classifying what a record's size covers.
///
/// The values mirror the memtrack record flags used by the consuming
/// memory-reporting service, so records can be handed over without
/// translation.
pub mod flags {
    /// Memory the kernel already attributes to the process in its smaps.
    pub const SMAPS_ACCOUNTED: u32 = 1 << 1;
    /// Memory not visible in the process's smaps accounting.
    pub const SMAPS_UNACCOUNTED: u32 = 1 << 2;
    /// Memory shared across processes.
    pub const SHARED: u32 = 1 << 3;
    /// Shared memory, proportionally attributed.
    pub const SHARED_PSS: u32 = 1 << 4;
    /// Memory private to the process.
    pub const PRIVATE: u32 = 1 << 5;
    /// Memory taken from system RAM.
    pub const SYSTEM: u32 = 1 << 6;
    /// Memory from a dedicated carveout.
    pub const DEDICATED: u32 = 1 << 7;
    /// Memory readable by the non-secure world.
    pub const NONSECURE: u32 = 1 << 8;
    /// Memory restricted to the secure world.
    pub const SECURE: u32 = 1 << 9;
}

/// A single classified memory total for one process and category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Bit-set of [`flags`] constants describing the classification.
    pub flags: u32,
    /// Total size in bytes.
    pub size_in_bytes: u64,
}

impl MemoryRecord {
    /// Returns true if every bit of `mask` is set on this record.
    pub fn has_flags(&self, mask: u32) -> bool {
        self.flags & mask == mask
    }
}
