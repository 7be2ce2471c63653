//! Collectors module for system-wide accounting tables.
//!
//! This module contains collectors that read system-wide ledgers, as opposed
//! to the per-process readers in `process`.

pub mod ion;
