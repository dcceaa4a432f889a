pub mod counters;
pub mod report;
pub mod sampler;
pub mod thermal;
pub mod topology;

pub use counters::CpuTicks;
pub use report::{CpuReport, build, build_default};
pub use sampler::SAMPLE_INTERVAL;
pub use topology::Topology;
