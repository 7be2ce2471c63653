//! Error types for memory accounting queries.

use std::io;

/// Errors returned by [`Memtrack::get_memory`](crate::Memtrack::get_memory).
///
/// Note the asymmetry between the two categories: an unreadable smaps table
/// reads as zero usage (GL), while an unreadable allocator table is a real
/// [`MemtrackError::Io`] (GRAPHICS).
#[derive(Debug, thiserror::Error)]
pub enum MemtrackError {
    /// The raw category value is not one of the supported categories.
    #[error("unsupported memory category: {0}")]
    InvalidArgument(i32),

    /// The process identity could not be resolved, or resolved to the
    /// privileged identity, which is excluded from per-process accounting.
    #[error("memory accounting refused for pid {pid}")]
    AccessDenied { pid: u32 },

    /// The system-wide allocator accounting table could not be read.
    #[error("allocator table unavailable: {0}")]
    Io(#[from] io::Error),
}
