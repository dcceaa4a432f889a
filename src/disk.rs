use std::io;
use std::path::Path;

use serde::Serialize;
use sysinfo::Disks;

use crate::error::{Error, Result};

pub const ROOT_MOUNT: &str = "/";

/// Space on one mounted filesystem, in bytes. `free` is what an
/// unprivileged allocation could still claim.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DiskInfo {
    pub total: u64,
    pub free: u64,
    pub used: u64,
}

impl DiskInfo {
    fn from_space(total: u64, available: u64) -> Self {
        DiskInfo {
            total,
            free: available,
            used: total.saturating_sub(available),
        }
    }
}

/// Space totals for the root mount.
pub fn read() -> Result<DiskInfo> {
    read_mount(Path::new(ROOT_MOUNT))
}

/// This goes through the platform disk list rather than the pseudo-file
/// source: the numbers come from a filesystem-statistics syscall, not a
/// parseable kernel file.
pub fn read_mount(mount: &Path) -> Result<DiskInfo> {
    let disks = Disks::new_with_refreshed_list();
    for disk in disks.list() {
        if disk.mount_point() == mount {
            return Ok(DiskInfo::from_space(
                disk.total_space(),
                disk.available_space(),
            ));
        }
    }
    Err(Error::Read {
        path: mount.to_path_buf(),
        source: io::Error::new(io::ErrorKind::NotFound, "no filesystem mounted here"),
    })
}
