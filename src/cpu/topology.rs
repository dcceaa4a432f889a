use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::source::FileSource;

pub const CPUINFO_PATH: &str = "/proc/cpuinfo";

/// Per-boot CPU facts from the description table. `model_name` and
/// `cache_size` stay empty on architectures that do not report them;
/// `frequency_mhz` is keyed by the same `cpuN` ids the tick table uses.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Topology {
    pub model_name: String,
    pub cores: u32,
    pub threads: u32,
    pub cache_size: String,
    pub frequency_mhz: HashMap<String, f64>,
}

pub fn read<S: FileSource>(source: &S) -> Result<Topology> {
    let contents = source.read_to_string(Path::new(CPUINFO_PATH))?;
    parse(&contents)
}

/// Single pass over `key : value` blocks, one block per logical core.
/// Model name and cache size keep their first occurrence, the physical
/// core count keeps its last, and every `processor` line bumps the
/// thread count.
pub fn parse(contents: &str) -> Result<Topology> {
    let mut topology = Topology::default();
    let mut current_thread: Option<String> = None;

    for line in contents.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        match key {
            "processor" => {
                topology.threads += 1;
                current_thread = Some(format!("cpu{value}"));
            }
            "model name" if topology.model_name.is_empty() => {
                topology.model_name = value.to_string();
            }
            "cache size" if topology.cache_size.is_empty() => {
                topology.cache_size = value.to_string();
            }
            "cpu cores" => {
                topology.cores = value.parse().map_err(|_| malformed("cpu cores", value))?;
            }
            "cpu MHz" => {
                // A frequency line before the first processor line has no
                // core to attach to.
                if let Some(thread) = &current_thread {
                    let freq: f64 = value.parse().map_err(|_| malformed("cpu MHz", value))?;
                    topology.frequency_mhz.insert(thread.clone(), freq);
                }
            }
            _ => {}
        }
    }

    if topology.threads == 0 {
        return Err(malformed("processor entries", "none"));
    }
    Ok(topology)
}

/// Utilization-weighted mean of per-core clock speeds, so idle cores
/// barely move the headline number. Cores without a sample, and samples
/// that are NaN, carry no weight; an all-idle weighting has no defined
/// value and comes back NaN.
pub fn effective_frequency(topology: &Topology, utilization: &HashMap<String, f64>) -> f64 {
    let mut weighted_sum = 0.0;
    let mut weight = 0.0;
    for (thread, freq) in &topology.frequency_mhz {
        let Some(util) = utilization.get(thread) else {
            continue;
        };
        if util.is_nan() {
            continue;
        }
        weighted_sum += freq * util;
        weight += util;
    }
    weighted_sum / weight
}

fn malformed(what: &'static str, value: &str) -> Error {
    Error::Parse {
        path: CPUINFO_PATH.into(),
        what,
        value: value.to_string(),
    }
}
