use std::collections::HashMap;

use crate::format::{
    format_bytes, format_celsius, format_mhz, format_percent, format_speed, truncate_unicode,
};
use crate::snapshot::HostSnapshot;

/// Plain-text table, one line per entry. Pure so the layout is testable
/// without a terminal; the binary just prints the lines.
pub fn table(snapshot: &HostSnapshot, per_core: bool) -> Vec<String> {
    let mut lines = Vec::new();
    let cpu = &snapshot.cpu;

    lines.push(format!(
        "cpu   {}",
        truncate_unicode(or_dash(&cpu.topology.model_name), 52)
    ));
    lines.push(format!(
        "      {} cores / {} threads, cache {}",
        cpu.topology.cores,
        cpu.topology.threads,
        or_dash(&cpu.topology.cache_size)
    ));
    lines.push(format!(
        "      util {}  freq {}  temp {}",
        format_percent(cpu.utilization_percent),
        format_mhz(cpu.effective_frequency_mhz),
        format_celsius(cpu.temperature_celsius)
    ));
    if per_core {
        for (thread, busy) in sorted_threads(&cpu.thread_utilization) {
            lines.push(format!("      {thread:<6} {}", format_percent(busy)));
        }
    }

    let memory = &snapshot.memory;
    lines.push(format!(
        "mem   used {} / {}, swap {} / {}",
        format_bytes(memory.used),
        format_bytes(memory.total),
        format_bytes(memory.swap_used),
        format_bytes(memory.swap_total)
    ));

    let disk = &snapshot.disk;
    lines.push(format!(
        "disk  used {} / {}, free {}",
        format_bytes(disk.used),
        format_bytes(disk.total),
        format_bytes(disk.free)
    ));

    for iface in &snapshot.interfaces {
        lines.push(format!(
            "net   {:<8} {:<8} {:>10}  rx {} ({} err)  tx {} ({} err)",
            truncate_unicode(&iface.name, 8),
            iface.state.value(),
            format_speed(*iface.speed_mbit.value()),
            format_bytes(*iface.rx_bytes.value()),
            iface.rx_errors.value(),
            format_bytes(*iface.tx_bytes.value()),
            iface.tx_errors.value()
        ));
    }

    lines
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

// Core ids sort by index, so cpu10 lands after cpu2 instead of between
// cpu1 and cpu2.
fn sorted_threads(utilization: &HashMap<String, f64>) -> Vec<(&str, f64)> {
    let mut threads: Vec<(&str, f64)> = utilization
        .iter()
        .map(|(thread, &busy)| (thread.as_str(), busy))
        .collect();
    threads.sort_by(|a, b| {
        thread_index(a.0)
            .cmp(&thread_index(b.0))
            .then_with(|| a.0.cmp(b.0))
    });
    threads
}

fn thread_index(thread: &str) -> u64 {
    thread
        .strip_prefix("cpu")
        .and_then(|index| index.parse().ok())
        .unwrap_or(u64::MAX)
}
