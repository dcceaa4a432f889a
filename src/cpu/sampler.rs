use std::collections::HashMap;
use std::time::Duration;

use tokio::time;

use crate::cpu::counters::{self, CpuTicks};
use crate::error::{Error, Result};
use crate::source::FileSource;

/// Gap between the two counter snapshots a utilization sample spans.
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Share of the interval the aggregate row spent busy, in percent.
pub async fn aggregate_utilization<S: FileSource>(source: &S, interval: Duration) -> Result<f64> {
    let (before, after) = paired(interval, || counters::aggregate(source)).await?;
    Ok(busy_percent(before, after))
}

/// Busy percentage per logical core over one interval. A core present in
/// the first snapshot but gone from the second fails the whole sample; a
/// core that only appears in the second has no baseline and is ignored.
pub async fn thread_utilization<S: FileSource>(
    source: &S,
    interval: Duration,
) -> Result<HashMap<String, f64>> {
    let (before, after) = paired(interval, || counters::per_thread(source)).await?;
    let mut usage = HashMap::with_capacity(before.len());
    for (thread, first) in before {
        let Some(second) = after.get(&thread) else {
            return Err(Error::ThreadVanished(thread));
        };
        usage.insert(thread, busy_percent(first, *second));
    }
    Ok(usage)
}

// Takes `snap` twice, `interval` apart. The sleep is the only suspension
// point in the crate; dropping the future abandons the sample there, and
// no file handle is held across it.
async fn paired<T>(interval: Duration, mut snap: impl FnMut() -> Result<T>) -> Result<(T, T)> {
    let before = snap()?;
    time::sleep(interval).await;
    let after = snap()?;
    Ok((before, after))
}

/// Busy share derived from two tick rows. NaN when no ticks elapsed over
/// the interval; deltas saturate at zero so a counter reset reads as a
/// fresh baseline instead of wrapping, and the result is clamped to
/// [0, 100].
pub fn busy_percent(before: CpuTicks, after: CpuTicks) -> f64 {
    let total = after.total.saturating_sub(before.total);
    if total == 0 {
        return f64::NAN;
    }
    let idle = after.idle.saturating_sub(before.idle);
    ((1.0 - idle as f64 / total as f64) * 100.0).clamp(0.0, 100.0)
}
