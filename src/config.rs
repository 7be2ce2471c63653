//! Configuration management for memtrack-core.
//!
//! This module defines the immutable configuration injected into
//! [`Memtrack`](crate::Memtrack) at construction, and handles loading it
//! from files. It supports YAML, JSON, and TOML formats.

use crate::record::{flags, MemoryRecord};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

// Default configuration constants
pub const DEFAULT_PROC_ROOT: &str = "/proc";
pub const DEFAULT_ION_TABLE_PATH: &str = "/proc/ion/vmalloc_ion";
pub const DEFAULT_SMAPS_BUFFER_KB: usize = 512;

/// Configuration for memory accounting queries.
///
/// All paths are injectable so tests can point the readers at a synthetic
/// proc tree instead of the live one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemtrackConfig {
    /// Root of the proc filesystem (default: /proc)
    #[serde(default = "default_proc_root")]
    pub proc_root: PathBuf,

    /// Path of the system-wide graphics allocation table
    /// (default: /proc/ion/vmalloc_ion)
    #[serde(default = "default_ion_table_path")]
    pub ion_table_path: PathBuf,

    /// Device-node prefixes identifying GPU-driver-backed mappings.
    /// Each prefix is compared in full against the mapping pathname.
    #[serde(default = "default_gpu_device_prefixes")]
    pub gpu_device_prefixes: Vec<String>,

    /// Read buffer size for smaps scans in KB (default: 512)
    #[serde(default = "default_smaps_buffer_kb")]
    pub smaps_buffer_kb: usize,

    /// Record shape templates copied into every report. The first template
    /// receives the computed category total.
    #[serde(default = "default_record_templates")]
    pub record_templates: Vec<MemoryRecord>,
}

fn default_proc_root() -> PathBuf {
    PathBuf::from(DEFAULT_PROC_ROOT)
}
fn default_ion_table_path() -> PathBuf {
    PathBuf::from(DEFAULT_ION_TABLE_PATH)
}
fn default_gpu_device_prefixes() -> Vec<String> {
    vec!["/dev/mali".to_string(), "/dev/ump".to_string()]
}
fn default_smaps_buffer_kb() -> usize {
    DEFAULT_SMAPS_BUFFER_KB
}
fn default_record_templates() -> Vec<MemoryRecord> {
    vec![MemoryRecord {
        flags: flags::SMAPS_UNACCOUNTED | flags::PRIVATE | flags::NONSECURE,
        size_in_bytes: 0,
    }]
}

impl Default for MemtrackConfig {
    fn default() -> Self {
        Self {
            proc_root: default_proc_root(),
            ion_table_path: default_ion_table_path(),
            gpu_device_prefixes: default_gpu_device_prefixes(),
            smaps_buffer_kb: default_smaps_buffer_kb(),
            record_templates: default_record_templates(),
        }
    }
}

/// Validate effective config (used at construction and by startup checks)
pub fn validate_effective_config(cfg: &MemtrackConfig) -> Result<(), Box<dyn std::error::Error>> {
    if cfg.record_templates.is_empty() {
        return Err("record_templates must contain at least one template".into());
    }

    if cfg.gpu_device_prefixes.is_empty() {
        return Err("gpu_device_prefixes must name at least one device prefix".into());
    }

    if cfg.smaps_buffer_kb == 0 {
        return Err("smaps_buffer_kb must be greater than zero".into());
    }

    Ok(())
}

/// Enhanced configuration loading with multiple format support
pub fn load_config(path: Option<&str>) -> Result<MemtrackConfig, Box<dyn std::error::Error>> {
    let path = if let Some(p) = path {
        PathBuf::from(p)
    } else {
        // Try default locations
        let defaults = [
            "/etc/memtrack/memtrack.yaml",
            "/etc/memtrack/memtrack.yml",
            "/etc/memtrack/memtrack.json",
            "./memtrack.yaml",
            "./memtrack.yml",
            "./memtrack.json",
        ];

        defaults
            .iter()
            .find(|p| Path::new(p).exists())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(""))
    };

    if !path.exists() || path.to_string_lossy().is_empty() {
        return Ok(MemtrackConfig::default());
    }

    let content = fs::read_to_string(&path)?;

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let config: MemtrackConfig = serde_json::from_str(&content)?;
            info!("Loaded JSON configuration from: {}", path.display());
            Ok(config)
        }
        Some("toml") => {
            let config: MemtrackConfig = toml::from_str(&content)?;
            info!("Loaded TOML configuration from: {}", path.display());
            Ok(config)
        }
        _ => {
            // Default to YAML
            let config: MemtrackConfig = serde_yaml::from_str(&content)?;
            info!("Loaded YAML configuration from: {}", path.display());
            Ok(config)
        }
    }
}
