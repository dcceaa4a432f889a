use std::collections::HashMap;

use insta::assert_debug_snapshot;
use vitals::cpu::{CpuReport, CpuTicks, Topology};
use vitals::disk::DiskInfo;
use vitals::memory::MemoryInfo;
use vitals::net::{Attr, InterfaceInfo};
use vitals::render;
use vitals::snapshot::HostSnapshot;

const GIB: u64 = 1024 * 1024 * 1024;

fn fixture() -> HostSnapshot {
    HostSnapshot {
        cpu: CpuReport {
            topology: Topology {
                model_name: "Test CPU".to_string(),
                cores: 4,
                threads: 4,
                cache_size: "8192 KB".to_string(),
                frequency_mhz: HashMap::from([("cpu0".to_string(), 2400.0)]),
            },
            ticks: CpuTicks {
                user: 100,
                system: 250,
                idle: 750,
                total: 1150,
            },
            utilization_percent: 25.0,
            thread_utilization: HashMap::from([
                ("cpu0".to_string(), 12.5),
                ("cpu1".to_string(), 100.0),
                ("cpu2".to_string(), f64::NAN),
                ("cpu10".to_string(), 0.0),
            ]),
            effective_frequency_mhz: 2400.0,
            temperature_celsius: Some(45.23),
        },
        memory: MemoryInfo {
            total: 16 * GIB,
            used: 8 * GIB,
            available: 8 * GIB,
            swap_total: 4 * GIB,
            swap_used: 0,
            swap_free: 4 * GIB,
        },
        disk: DiskInfo {
            total: 250 * GIB,
            free: 150 * GIB,
            used: 100 * GIB,
        },
        interfaces: vec![
            InterfaceInfo {
                name: "eth0".to_string(),
                state: Attr::Read("up".to_string()),
                speed_mbit: Attr::Read(1000),
                rx_bytes: Attr::Read(GIB),
                tx_bytes: Attr::Read(512 * 1024 * 1024),
                rx_errors: Attr::Read(0),
                tx_errors: Attr::Read(3),
            },
            InterfaceInfo {
                name: "lo".to_string(),
                state: Attr::Read("unknown".to_string()),
                speed_mbit: Attr::Defaulted(-1),
                rx_bytes: Attr::Read(2048),
                tx_bytes: Attr::Read(2048),
                rx_errors: Attr::Read(0),
                tx_errors: Attr::Read(0),
            },
        ],
    }
}

#[test]
fn table_layout_stays_stable() {
    let lines = render::table(&fixture(), true);

    assert_debug_snapshot!(lines, @r#"
    [
        "cpu   Test CPU",
        "      4 cores / 4 threads, cache 8192 KB",
        "      util 25.00%  freq 2400.0 MHz  temp 45.23 °C",
        "      cpu0   12.50%",
        "      cpu1   100.00%",
        "      cpu2   n/a",
        "      cpu10  0.00%",
        "mem   used 8.0 GB / 16.0 GB, swap 0 B / 4.0 GB",
        "disk  used 100.0 GB / 250.0 GB, free 150.0 GB",
        "net   eth0     up        1000 Mb/s  rx 1.0 GB (0 err)  tx 512.0 MB (3 err)",
        "net   lo       unknown           -  rx 2 KB (0 err)  tx 2 KB (0 err)",
    ]
    "#);
}

#[test]
fn per_core_rows_can_be_suppressed() {
    let lines = render::table(&fixture(), false);

    assert!(!lines.iter().any(|line| line.contains("cpu0")));
    // The headline utilization stays.
    assert!(lines.iter().any(|line| line.contains("util 25.00%")));
}

#[test]
fn json_serialization_flattens_attribute_wrappers() {
    let value = serde_json::to_value(fixture()).unwrap();

    assert_eq!(value["cpu"]["temperature_celsius"], 45.23);
    assert_eq!(value["cpu"]["topology"]["threads"], 4);
    assert_eq!(value["memory"]["total"], 16 * GIB);
    // Attr serializes as its bare value, defaulted or not.
    assert_eq!(value["interfaces"][0]["speed_mbit"], 1000);
    assert_eq!(value["interfaces"][1]["speed_mbit"], -1);
    assert_eq!(value["interfaces"][0]["state"], "up");
    // NaN has no JSON representation and comes out null.
    assert!(value["cpu"]["thread_utilization"]["cpu2"].is_null());
}
