use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::source::FileSource;

pub const NET_DIR: &str = "/sys/class/net";

/// A best-effort attribute read. Defaulted values stay distinguishable
/// from genuinely read ones instead of collapsing into silent zeros.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Attr<T> {
    Read(T),
    Defaulted(T),
}

impl<T> Attr<T> {
    pub fn value(&self) -> &T {
        match self {
            Attr::Read(value) | Attr::Defaulted(value) => value,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, Attr::Defaulted(_))
    }
}

/// One interface directory under the class tree. `speed_mbit` is the
/// negotiated link cap; virtual and down interfaces do not report one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InterfaceInfo {
    pub name: String,
    pub state: Attr<String>,
    pub speed_mbit: Attr<i64>,
    pub rx_bytes: Attr<u64>,
    pub tx_bytes: Attr<u64>,
    pub rx_errors: Attr<u64>,
    pub tx_errors: Attr<u64>,
}

/// All interfaces, sorted by name. Failing to enumerate the class tree
/// is fatal; failing to read any single attribute of an interface falls
/// back to that attribute's default.
pub fn read<S: FileSource>(source: &S) -> Result<Vec<InterfaceInfo>> {
    let names = source.list_dir(Path::new(NET_DIR))?;
    Ok(names
        .iter()
        .map(|name| read_interface(source, name))
        .collect())
}

fn read_interface<S: FileSource>(source: &S, name: &str) -> InterfaceInfo {
    InterfaceInfo {
        name: name.to_string(),
        state: attr_or(source, name, "operstate", "unknown".to_string()),
        speed_mbit: speed_attr(source, name),
        rx_bytes: attr_or(source, name, "statistics/rx_bytes", 0),
        tx_bytes: attr_or(source, name, "statistics/tx_bytes", 0),
        rx_errors: attr_or(source, name, "statistics/rx_errors", 0),
        tx_errors: attr_or(source, name, "statistics/tx_errors", 0),
    }
}

fn attr_or<S: FileSource, T: FromStr>(
    source: &S,
    iface: &str,
    attr: &'static str,
    default: T,
) -> Attr<T> {
    match read_attr(source, iface, attr) {
        Ok(value) => Attr::Read(value),
        Err(err) => {
            warn!("{iface}: falling back to default for {attr}: {err}");
            Attr::Defaulted(default)
        }
    }
}

// Unreported link speed is the norm for loopback and veth pairs, so this
// one logs quieter than the rest.
fn speed_attr<S: FileSource>(source: &S, iface: &str) -> Attr<i64> {
    match read_attr(source, iface, "speed") {
        Ok(value) => Attr::Read(value),
        Err(err) => {
            debug!("{iface}: link speed not reported: {err}");
            Attr::Defaulted(-1)
        }
    }
}

fn read_attr<S: FileSource, T: FromStr>(
    source: &S,
    iface: &str,
    attr: &'static str,
) -> Result<T> {
    let path = Path::new(NET_DIR).join(iface).join(attr);
    let contents = source.read_to_string(&path)?;
    let trimmed = contents.trim();
    trimmed.parse().map_err(|_| Error::Parse {
        path,
        what: attr,
        value: trimmed.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemSource;

    fn script_interface(source: &MemSource, name: &str) {
        source.push(format!("/sys/class/net/{name}/operstate"), "up\n");
        source.push(format!("/sys/class/net/{name}/speed"), "1000\n");
        source.push(format!("/sys/class/net/{name}/statistics/rx_bytes"), "123\n");
        source.push(format!("/sys/class/net/{name}/statistics/tx_bytes"), "456\n");
        source.push(format!("/sys/class/net/{name}/statistics/rx_errors"), "0\n");
        source.push(format!("/sys/class/net/{name}/statistics/tx_errors"), "7\n");
    }

    #[test]
    fn fully_populated_interface_reads_every_attribute() {
        let source = MemSource::new();
        script_interface(&source, "eth0");

        let interfaces = read(&source).unwrap();
        assert_eq!(interfaces.len(), 1);
        let eth0 = &interfaces[0];
        assert_eq!(eth0.name, "eth0");
        assert_eq!(eth0.state, Attr::Read("up".to_string()));
        assert_eq!(eth0.speed_mbit, Attr::Read(1000));
        assert_eq!(eth0.rx_bytes, Attr::Read(123));
        assert_eq!(eth0.tx_errors, Attr::Read(7));
        assert!(!eth0.state.is_defaulted());
    }

    #[test]
    fn interfaces_come_back_sorted_by_name() {
        let source = MemSource::new();
        script_interface(&source, "lo");
        script_interface(&source, "eth1");
        script_interface(&source, "eth0");

        let interfaces = read(&source).unwrap();
        let names: Vec<&str> = interfaces.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["eth0", "eth1", "lo"]);
    }

    #[test]
    fn missing_speed_defaults_to_negative_one() {
        let source = MemSource::new();
        source.push("/sys/class/net/lo/operstate", "unknown");
        source.push("/sys/class/net/lo/statistics/rx_bytes", "99");

        let interfaces = read(&source).unwrap();
        let lo = &interfaces[0];
        assert_eq!(lo.speed_mbit, Attr::Defaulted(-1));
        assert!(lo.speed_mbit.is_defaulted());
        assert_eq!(*lo.speed_mbit.value(), -1);
    }

    #[test]
    fn missing_state_defaults_to_unknown() {
        let source = MemSource::new();
        source.push("/sys/class/net/veth0/statistics/rx_bytes", "1");

        let interfaces = read(&source).unwrap();
        assert_eq!(interfaces[0].state, Attr::Defaulted("unknown".to_string()));
    }

    #[test]
    fn garbage_counter_defaults_to_zero() {
        let source = MemSource::new();
        source.push("/sys/class/net/eth0/operstate", "up");
        source.push("/sys/class/net/eth0/statistics/rx_bytes", "many");

        let interfaces = read(&source).unwrap();
        assert_eq!(interfaces[0].rx_bytes, Attr::Defaulted(0));
    }

    #[test]
    fn unlistable_class_tree_is_fatal() {
        let source = MemSource::new().with_file("/proc/stat", "cpu 1 2 3 4");
        assert!(read(&source).is_err());
    }
}
