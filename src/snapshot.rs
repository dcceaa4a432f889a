use std::time::Duration;

use serde::Serialize;

use crate::cpu::{self, CpuReport};
use crate::disk::{self, DiskInfo};
use crate::error::Result;
use crate::memory::{self, MemoryInfo};
use crate::net::{self, InterfaceInfo};
use crate::source::FileSource;

/// Everything the agent reports for one host at one point in time.
#[derive(Clone, Debug, Serialize)]
pub struct HostSnapshot {
    pub cpu: CpuReport,
    pub memory: MemoryInfo,
    pub disk: DiskInfo,
    pub interfaces: Vec<InterfaceInfo>,
}

/// Collects a full snapshot at the default one-second sampling interval.
pub async fn gather<S: FileSource>(source: &S) -> Result<HostSnapshot> {
    gather_with_interval(source, cpu::SAMPLE_INTERVAL).await
}

/// The CPU report pays the sampling interval; memory, disk, and network
/// are instantaneous. Disk space comes from a syscall against the live
/// mount table, not from `source`.
pub async fn gather_with_interval<S: FileSource>(
    source: &S,
    interval: Duration,
) -> Result<HostSnapshot> {
    let cpu = cpu::build(source, interval)
        .await
        .map_err(|err| err.stage("cpu report"))?;
    let memory = memory::read(source).map_err(|err| err.stage("memory read"))?;
    let disk = disk::read().map_err(|err| err.stage("disk read"))?;
    let interfaces = net::read(source).map_err(|err| err.stage("network read"))?;

    Ok(HostSnapshot {
        cpu,
        memory,
        disk,
        interfaces,
    })
}
