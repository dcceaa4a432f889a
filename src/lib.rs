pub mod config;
pub mod cpu;
pub mod disk;
pub mod error;
pub mod format;
pub mod memory;
pub mod net;
pub mod render;
pub mod snapshot;
pub mod source;

pub use error::{Error, Result};
pub use snapshot::{HostSnapshot, gather, gather_with_interval};
pub use source::{FileSource, HostFs, MemSource};
