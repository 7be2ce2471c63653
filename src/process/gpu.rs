//! GPU mapping scan over /proc/<pid>/smaps.
//!
//! This module sums the `Size:` attribute of virtual-memory mappings backed
//! by GPU driver device nodes. The kernel does not attribute this memory to
//! the process anywhere else, so the total feeds the "smaps unaccounted"
//! record of the GL category.

use crate::config::MemtrackConfig;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Mappings with pathnames shorter than this are never GPU device nodes.
const MIN_PATHNAME_LEN: usize = 8;

/// Header line of one smaps mapping record.
struct MappingHeader<'a> {
    start: u64,
    end: u64,
    pathname: Option<&'a str>,
}

/// Detects the boundary of a new mapping record: a leading `start-end`
/// token. Attribute lines (`Size:`, `Rss:`, `VmFlags:`, ...) never carry a
/// hyphen in their first token. The test is deliberately looser than the
/// full header parse so that a corrupt header still closes the previous
/// record instead of leaking its attribute block into it.
fn is_mapping_boundary(line: &str) -> bool {
    match line.split_whitespace().next() {
        Some(token) => token.contains('-'),
        None => false,
    }
}

/// Parses the leading `<start>-<end>` hex address range of a header line.
fn parse_address_range(line: &str) -> Option<(u64, u64)> {
    let token = line.split_whitespace().next()?;
    let (start, end) = token.split_once('-')?;
    let start = u64::from_str_radix(start, 16).ok()?;
    let end = u64::from_str_radix(end, 16).ok()?;
    Some((start, end))
}

/// Parses a full smaps header line:
/// `<start>-<end> <perms> <offset> <major>:<minor> <inode> [pathname]`
///
/// The pathname begins after the inode field and may itself contain spaces,
/// so the line is split into at most six fields and the tail is taken whole.
fn parse_mapping_header(line: &str) -> Option<MappingHeader<'_>> {
    let (start, end) = parse_address_range(line)?;

    let mut fields = line.splitn(6, ' ');
    fields.next()?; // address range, parsed above
    let perms = fields.next()?;
    if perms.is_empty() {
        return None;
    }
    let offset = fields.next()?;
    u64::from_str_radix(offset, 16).ok()?;
    let device = fields.next()?;
    let (major, minor) = device.split_once(':')?;
    u64::from_str_radix(major, 16).ok()?;
    u64::from_str_radix(minor, 16).ok()?;
    let inode = fields.next()?;
    inode.parse::<u64>().ok()?;

    let pathname = fields
        .next()
        .map(str::trim_start)
        .filter(|name| !name.is_empty());

    Some(MappingHeader {
        start,
        end,
        pathname,
    })
}

/// Decides whether a mapping pathname belongs to the GPU driver.
fn is_gpu_mapping(pathname: &str, prefixes: &[String]) -> bool {
    pathname.len() >= MIN_PATHNAME_LEN
        && prefixes.iter().any(|p| pathname.starts_with(p.as_str()))
}

/// Parses kilobyte values from smaps attribute lines.
fn parse_kb_value(v: &str) -> Option<u64> {
    v.split_whitespace().next()?.parse().ok()
}

/// Sums the resident `Size:` of GPU-driver mappings in `<proc_path>/smaps`.
///
/// Returns the total in bytes. An unopenable smaps file reads as zero usage
/// rather than an error: the consuming service treats "no data" and "no GPU
/// memory" the same for this category, and a pid that exited between
/// discovery and query must not fail the whole report.
pub fn scan_gpu_mappings(proc_path: &Path, cfg: &MemtrackConfig) -> u64 {
    let smaps_path = proc_path.join("smaps");
    let file = match fs::File::open(&smaps_path) {
        Ok(f) => f,
        Err(e) => {
            debug!("open {} failed: {}", smaps_path.display(), e);
            return 0;
        }
    };
    let reader = BufReader::with_capacity(cfg.smaps_buffer_kb * 1024, file);

    let mut sum_kb: u64 = 0;
    let mut included = false;

    for line in reader.lines() {
        let line = match line {
            // Mid-stream read errors end the scan with the partial sum
            Ok(l) => l,
            Err(e) => {
                debug!("read {} failed: {}", smaps_path.display(), e);
                break;
            }
        };

        if is_mapping_boundary(&line) {
            // New mapping record; a malformed header drops its whole
            // attribute block from the sum
            included = match parse_mapping_header(&line) {
                Some(header) => match header.pathname {
                    Some(name) if is_gpu_mapping(name, &cfg.gpu_device_prefixes) => {
                        debug!(
                            "gpu mapping {:x}-{:x} {}",
                            header.start, header.end, name
                        );
                        true
                    }
                    _ => false,
                },
                None => false,
            };
            continue;
        }

        if included {
            if let Some(v) = line.strip_prefix("Size:") {
                sum_kb += parse_kb_value(v).unwrap_or(0);
            }
        }
    }

    sum_kb * 1024
}
