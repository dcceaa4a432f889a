use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::source::FileSource;

pub const THERMAL_DIR: &str = "/sys/class/thermal";

/// Zone type the kernel gives the CPU package sensor.
pub const PACKAGE_ZONE_TYPE: &str = "x86_pkg_temp";

/// Package temperature in degrees Celsius, rounded to two decimals.
///
/// Walks the thermal zones and takes the first whose declared type is the
/// package sensor. No such zone anywhere, including a missing zone tree
/// altogether, is `ZoneNotFound`; a matched zone with an unreadable
/// reading is a hard error, since that sensor exists but cannot be read.
pub fn package_temperature<S: FileSource>(source: &S) -> Result<f64> {
    let dir = Path::new(THERMAL_DIR);
    let entries = match source.list_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!("thermal zone tree unavailable: {err}");
            return Err(Error::ZoneNotFound);
        }
    };

    for name in entries {
        if !name.starts_with("thermal_zone") {
            continue;
        }
        let zone = dir.join(&name);
        let zone_type = match source.read_to_string(&zone.join("type")) {
            Ok(contents) => contents.trim().to_string(),
            Err(err) => {
                debug!("skipping thermal zone {name}: {err}");
                continue;
            }
        };
        if zone_type == PACKAGE_ZONE_TYPE {
            return zone_temperature(source, &zone);
        }
    }

    Err(Error::ZoneNotFound)
}

fn zone_temperature<S: FileSource>(source: &S, zone: &Path) -> Result<f64> {
    let path = zone.join("temp");
    let contents = source.read_to_string(&path)?;
    let raw = contents.trim();
    let millidegrees: i64 = raw.parse().map_err(|_| Error::Parse {
        path,
        what: "millidegree reading",
        value: raw.to_string(),
    })?;
    Ok((millidegrees as f64 / 10.0).round() / 100.0)
}
