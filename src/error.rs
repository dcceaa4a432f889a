use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed {what} in {}: `{value}`", path.display())]
    Parse {
        path: PathBuf,
        what: &'static str,
        value: String,
    },

    /// A logical core seen in the first counter snapshot was gone in the
    /// second. Surfaced instead of dropping the core so callers notice
    /// topology churn mid-sample.
    #[error("cpu thread `{0}` vanished between counter snapshots")]
    ThreadVanished(String),

    /// No thermal zone reports the cpu package sensor type. Expected on
    /// non-x86 and virtualized hosts; report assembly degrades instead of
    /// failing.
    #[error("no cpu package thermal zone present")]
    ZoneNotFound,

    #[error("{stage} failed: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub(crate) fn stage(self, stage: &'static str) -> Error {
        Error::Stage {
            stage,
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_names_field_and_token() {
        let err = Error::Parse {
            path: "/proc/stat".into(),
            what: "tick count",
            value: "12x4".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("tick count"));
        assert!(message.contains("/proc/stat"));
        assert!(message.contains("12x4"));
    }

    #[test]
    fn stage_wrapper_keeps_cause_visible() {
        let inner = Error::ThreadVanished("cpu3".to_string());
        let err = inner.stage("thread utilization sampling");
        assert!(err.to_string().contains("thread utilization sampling"));
        assert!(matches!(err, Error::Stage { source, .. } if matches!(*source, Error::ThreadVanished(_))));
    }
}
