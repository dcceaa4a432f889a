use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::source::FileSource;

pub const STAT_PATH: &str = "/proc/stat";

/// One row of the kernel tick table. Counters only move forward within a
/// boot cycle. `total` sums every column of the row, not just the three
/// tracked ones; utilization math divides by it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CpuTicks {
    pub user: u64,
    pub system: u64,
    pub idle: u64,
    pub total: u64,
}

/// Ticks from the aggregate `cpu` row.
pub fn aggregate<S: FileSource>(source: &S) -> Result<CpuTicks> {
    let contents = source.read_to_string(Path::new(STAT_PATH))?;
    parse_aggregate(&contents)
}

/// Ticks per logical core, keyed by the kernel's `cpuN` identifier.
pub fn per_thread<S: FileSource>(source: &S) -> Result<HashMap<String, CpuTicks>> {
    let contents = source.read_to_string(Path::new(STAT_PATH))?;
    parse_per_thread(&contents)
}

pub fn parse_aggregate(contents: &str) -> Result<CpuTicks> {
    for line in contents.lines() {
        let mut tokens = line.split_whitespace();
        if tokens.next() == Some("cpu") {
            return parse_fields(&tokens.collect::<Vec<_>>());
        }
    }
    Err(malformed("aggregate cpu row", "missing"))
}

pub fn parse_per_thread(contents: &str) -> Result<HashMap<String, CpuTicks>> {
    let mut threads = HashMap::new();
    for line in contents.lines() {
        let mut tokens = line.split_whitespace();
        let Some(id) = tokens.next() else { continue };
        if !is_thread_id(id) {
            continue;
        }
        let ticks = parse_fields(&tokens.collect::<Vec<_>>())?;
        threads.insert(id.to_string(), ticks);
    }
    Ok(threads)
}

// `cpu` followed by a bare core index, so `cpufreq`-style rows stay out.
fn is_thread_id(token: &str) -> bool {
    token
        .strip_prefix("cpu")
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

// Field count varies across kernels; anything under user/nice/system/idle
// is not a tick row.
fn parse_fields(fields: &[&str]) -> Result<CpuTicks> {
    if fields.len() < 4 {
        return Err(malformed("tick row", &fields.join(" ")));
    }
    let mut ticks = CpuTicks::default();
    for (position, field) in fields.iter().enumerate() {
        let value: u64 = field.parse().map_err(|_| malformed("tick count", field))?;
        ticks.total += value;
        match position {
            0 => ticks.user = value,
            2 => ticks.system = value,
            3 => ticks.idle = value,
            _ => {}
        }
    }
    Ok(ticks)
}

fn malformed(what: &'static str, value: &str) -> Error {
    Error::Parse {
        path: STAT_PATH.into(),
        what,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAT: &str = "\
cpu  100 0 200 700 0 0 0
cpu0 50 0 100 350 0 0 0
cpu1 50 0 100 350 0 0 0
intr 12345
ctxt 67890
";

    #[test]
    fn aggregate_row_sums_every_field() {
        let ticks = parse_aggregate(STAT).unwrap();
        assert_eq!(ticks.user, 100);
        assert_eq!(ticks.system, 200);
        assert_eq!(ticks.idle, 700);
        assert_eq!(ticks.total, 1000);
    }

    #[test]
    fn aggregate_row_with_fewer_trailing_fields_still_parses() {
        let ticks = parse_aggregate("cpu 150 0 250 750\n").unwrap();
        assert_eq!(ticks.total, 1150);
        assert_eq!(ticks.idle, 750);
    }

    #[test]
    fn per_thread_rows_are_keyed_by_core_id() {
        let threads = parse_per_thread(STAT).unwrap();
        assert_eq!(threads.len(), 2);
        assert_eq!(threads["cpu0"].idle, 350);
        assert_eq!(threads["cpu1"].total, 500);
    }

    #[test]
    fn missing_aggregate_row_is_a_parse_error() {
        let err = parse_aggregate("cpu0 1 2 3 4\n").unwrap_err();
        assert!(matches!(err, Error::Parse { what, .. } if what == "aggregate cpu row"));
    }

    #[test]
    fn short_row_is_a_parse_error() {
        let err = parse_aggregate("cpu 1 2 3\n").unwrap_err();
        assert!(matches!(err, Error::Parse { what, .. } if what == "tick row"));
    }

    #[test]
    fn non_numeric_field_is_a_parse_error() {
        let err = parse_per_thread("cpu0 1 2 x 4\n").unwrap_err();
        assert!(matches!(err, Error::Parse { value, .. } if value == "x"));
    }

    #[test]
    fn thread_id_filter_rejects_non_core_rows() {
        assert!(is_thread_id("cpu0"));
        assert!(is_thread_id("cpu12"));
        assert!(!is_thread_id("cpu"));
        assert!(!is_thread_id("cpufreq"));
        assert!(!is_thread_id("intr"));
    }

    #[test]
    fn reads_go_through_the_source() {
        use crate::source::MemSource;

        let source = MemSource::new().with_file(STAT_PATH, STAT);
        let ticks = aggregate(&source).unwrap();
        assert_eq!(ticks.total, 1000);
        let threads = per_thread(&source).unwrap();
        assert_eq!(threads.len(), 2);
    }
}
