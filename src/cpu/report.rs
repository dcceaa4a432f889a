use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;

use crate::cpu::counters::{self, CpuTicks};
use crate::cpu::sampler;
use crate::cpu::thermal;
use crate::cpu::topology::{self, Topology};
use crate::error::{Error, Result};
use crate::source::FileSource;

/// One consistent view of the CPU, assembled fresh per call.
#[derive(Clone, Debug, Serialize)]
pub struct CpuReport {
    pub topology: Topology,
    pub ticks: CpuTicks,
    pub utilization_percent: f64,
    pub thread_utilization: HashMap<String, f64>,
    pub effective_frequency_mhz: f64,
    /// `None` when the host has no package thermal zone.
    pub temperature_celsius: Option<f64>,
}

/// Builds a report from two utilization samples plus the instantaneous
/// reads, paying `interval` twice. The per-core sample is taken once and
/// feeds both the reported map and the frequency weighting, so the two
/// never disagree. Every failure is wrapped with the sub-read that
/// caused it; a missing thermal zone alone never fails the report.
pub async fn build<S: FileSource>(source: &S, interval: Duration) -> Result<CpuReport> {
    let thread_utilization = sampler::thread_utilization(source, interval)
        .await
        .map_err(|err| err.stage("per-core utilization sampling"))?;

    let topology = topology::read(source).map_err(|err| err.stage("topology read"))?;
    let effective_frequency_mhz = topology::effective_frequency(&topology, &thread_utilization);

    let temperature_celsius = match thermal::package_temperature(source) {
        Ok(celsius) => Some(celsius),
        Err(Error::ZoneNotFound) => None,
        Err(err) => return Err(err.stage("thermal read")),
    };

    let utilization_percent = sampler::aggregate_utilization(source, interval)
        .await
        .map_err(|err| err.stage("aggregate utilization sampling"))?;
    let ticks = counters::aggregate(source).map_err(|err| err.stage("counter read"))?;

    Ok(CpuReport {
        topology,
        ticks,
        utilization_percent,
        thread_utilization,
        effective_frequency_mhz,
        temperature_celsius,
    })
}

/// `build` at the default one-second interval.
pub async fn build_default<S: FileSource>(source: &S) -> Result<CpuReport> {
    build(source, sampler::SAMPLE_INTERVAL).await
}
