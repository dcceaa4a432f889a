use std::collections::{BTreeSet, HashMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Error, Result};

/// Access to the kernel pseudo-files the readers parse. Paths are always
/// the canonical kernel paths; implementations decide where they actually
/// resolve. `list_dir` returns entry names in sorted order, not full
/// paths, so callers keep building canonical paths and walk entries in a
/// stable order.
pub trait FileSource: Send + Sync {
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn list_dir(&self, path: &Path) -> Result<Vec<String>>;
}

/// Live filesystem. With a root set, canonical paths resolve under that
/// prefix instead, so an agent can inspect a host tree bind-mounted into
/// a container.
#[derive(Clone, Debug, Default)]
pub struct HostFs {
    root: Option<PathBuf>,
}

impl HostFs {
    pub fn new() -> Self {
        HostFs { root: None }
    }

    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        HostFs {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path.strip_prefix("/").unwrap_or(path)),
            None => path.to_path_buf(),
        }
    }
}

impl FileSource for HostFs {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let resolved = self.resolve(path);
        std::fs::read_to_string(&resolved).map_err(|source| Error::Read {
            path: resolved,
            source,
        })
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>> {
        let resolved = self.resolve(path);
        let entries = std::fs::read_dir(&resolved).map_err(|source| Error::Read {
            path: resolved.clone(),
            source,
        })?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| Error::Read {
                path: resolved.clone(),
                source,
            })?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }
}

/// In-memory source for tests. Each path carries a queue of contents;
/// successive reads pop the queue and the final entry then repeats, which
/// is what two-snapshot sampling needs to see counters move.
#[derive(Debug, Default)]
pub struct MemSource {
    files: Mutex<HashMap<PathBuf, VecDeque<String>>>,
}

impl MemSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.push(path, contents);
        self
    }

    /// Queue another contents version for `path`.
    pub fn push(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        let mut files = self.files.lock().unwrap_or_else(|e| e.into_inner());
        files
            .entry(path.into())
            .or_default()
            .push_back(contents.into());
    }

    fn not_scripted(path: &Path) -> Error {
        Error::Read {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "not scripted"),
        }
    }
}

impl FileSource for MemSource {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let mut files = self.files.lock().unwrap_or_else(|e| e.into_inner());
        let queue = files.get_mut(path).ok_or_else(|| Self::not_scripted(path))?;
        let contents = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        contents.ok_or_else(|| Self::not_scripted(path))
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>> {
        let files = self.files.lock().unwrap_or_else(|e| e.into_inner());
        let mut names = BTreeSet::new();
        for key in files.keys() {
            if let Ok(rest) = key.strip_prefix(path)
                && let Some(first) = rest.components().next()
            {
                names.insert(first.as_os_str().to_string_lossy().into_owned());
            }
        }
        if names.is_empty() {
            return Err(Self::not_scripted(path));
        }
        Ok(names.into_iter().collect())
    }
}
