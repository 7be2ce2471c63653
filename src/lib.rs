//! Memtrack Core Library
//!
//! This library reports per-process memory usage broken down by category
//! (GPU-mapped memory, graphics-buffer allocations) for a device
//! memory-accounting subsystem. It is designed to be embedded into a
//! higher-level memory-reporting service that aggregates per-process
//! statistics across subsystems.
//!
//! # Features
//!
//! - **GL accounting**: resident size of GPU-driver device mappings, summed
//!   from the process's smaps table
//! - **Graphics accounting**: graphics-buffer allocations attributed to the
//!   process via the system-wide ion allocation table
//! - **Injectable paths**: every table location is configurable, so tests
//!   run against synthetic proc trees
//! - **Capacity probing**: query with zero capacity to learn the record
//!   count before allocating
//!
//! # Usage
//!
//! ```rust,no_run
//! use memtrack_core::{Category, Memtrack, MemtrackConfig};
//!
//! # fn main() -> Result<(), memtrack_core::MemtrackError> {
//! // Create the tracker with default /proc paths
//! let tracker = Memtrack::new(MemtrackConfig::default());
//! tracker.init()?;
//!
//! // Probe for the record count, then query
//! let probe = tracker.get_memory(1234, Category::Gl, 0)?;
//! let report = tracker.get_memory(1234, Category::Gl, probe.total_records)?;
//!
//! for record in &report.records {
//!     println!("flags {:#x}: {} bytes", record.flags, record.size_in_bytes);
//! }
//! # Ok(())
//! # }
//! ```

pub mod collectors;
pub mod config;
pub mod error;
pub mod process;
pub mod record;
pub mod reporter;
pub mod startup_checks;

// Re-export main types for convenience
pub use config::MemtrackConfig;
pub use error::MemtrackError;
pub use record::MemoryRecord;
pub use reporter::{Category, MemoryReport, Memtrack};
