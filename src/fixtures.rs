//! Test fixtures: an in-memory storage for exercising the file loader and
//! the full pipeline without touching the filesystem.

use std::collections::{BTreeMap, BTreeSet};
use std::io;

use regex::Regex;

use crate::storage::Storage;

/// In-memory [`Storage`] built up with the `file`/`dir` builder methods.
/// Directories exist when declared explicitly or implied by a file path.
#[derive(Default)]
pub struct MemoryStorage {
    files: BTreeMap<String, String>,
    dirs: BTreeSet<String>,
}

impl MemoryStorage {
    pub fn new() -> MemoryStorage {
        MemoryStorage::default()
    }

    pub fn file(mut self, path: &str, content: &str) -> MemoryStorage {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    pub fn dir(mut self, path: &str) -> MemoryStorage {
        self.dirs.insert(path.to_string());
        self
    }
}

impl Storage for MemoryStorage {
    fn read(&self, path: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.files.get(path).map(|content| content.as_bytes().to_vec()))
    }

    fn list(&self, path: &str, expression: &Regex) -> io::Result<Option<Vec<String>>> {
        let prefix = format!("{path}/");
        let exists =
            self.dirs.contains(path) || self.files.keys().any(|file| file.starts_with(&prefix));
        if !exists {
            return Ok(None);
        }

        Ok(Some(
            self.files
                .keys()
                .filter_map(|file| file.strip_prefix(&prefix))
                .filter(|rest| !rest.contains('/'))
                .filter(|name| expression.is_match(name))
                .map(str::to_string)
                .collect(),
        ))
    }
}
