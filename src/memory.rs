use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::source::FileSource;

pub const MEMINFO_PATH: &str = "/proc/meminfo";

/// RAM and swap occupancy in bytes. `used` counts what is not available
/// for new allocations, so page cache the kernel can drop is not charged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MemoryInfo {
    pub total: u64,
    pub used: u64,
    pub available: u64,
    pub swap_total: u64,
    pub swap_used: u64,
    pub swap_free: u64,
}

pub fn read<S: FileSource>(source: &S) -> Result<MemoryInfo> {
    let contents = source.read_to_string(Path::new(MEMINFO_PATH))?;
    parse(&contents)
}

/// Every required key must be present; a table without `MemAvailable`
/// (kernels before 3.14) is rejected rather than read as zero.
pub fn parse(contents: &str) -> Result<MemoryInfo> {
    let mut total = None;
    let mut available = None;
    let mut swap_total = None;
    let mut swap_free = None;

    for line in contents.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let (slot, name) = match key.trim() {
            "MemTotal" => (&mut total, "MemTotal"),
            "MemAvailable" => (&mut available, "MemAvailable"),
            "SwapTotal" => (&mut swap_total, "SwapTotal"),
            "SwapFree" => (&mut swap_free, "SwapFree"),
            _ => continue,
        };
        *slot = Some(parse_kilobytes(name, rest)?);
    }

    let require = |slot: Option<u64>, key: &'static str| {
        slot.ok_or_else(|| Error::Parse {
            path: MEMINFO_PATH.into(),
            what: key,
            value: "missing".to_string(),
        })
    };
    let total = require(total, "MemTotal")?;
    let available = require(available, "MemAvailable")?;
    let swap_total = require(swap_total, "SwapTotal")?;
    let swap_free = require(swap_free, "SwapFree")?;

    Ok(MemoryInfo {
        total,
        used: total.saturating_sub(available),
        available,
        swap_total,
        swap_used: swap_total.saturating_sub(swap_free),
        swap_free,
    })
}

// Lines read `MemTotal:   16384256 kB`; values are kilobytes regardless
// of the printed unit.
fn parse_kilobytes(key: &'static str, rest: &str) -> Result<u64> {
    let value = rest.trim().split_whitespace().next().unwrap_or("");
    let kilobytes: u64 = value.parse().map_err(|_| Error::Parse {
        path: MEMINFO_PATH.into(),
        what: key,
        value: value.to_string(),
    })?;
    Ok(kilobytes * 1024)
}
