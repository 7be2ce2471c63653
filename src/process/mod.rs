//! Per-process readers over the proc filesystem.
//!
//! This module provides:
//! - `identity`: owning-uid resolution from /proc/<pid>/status
//! - `gpu`: GPU-driver mapping scan over /proc/<pid>/smaps

pub mod gpu;
pub mod identity;

// Re-export commonly used functions
pub use gpu::scan_gpu_mappings;
pub use identity::resolve_owner_uid;
