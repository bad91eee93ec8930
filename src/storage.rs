//! The storage collaborator.
//!
//! The file loader only needs two operations: read a file that may not exist,
//! and list the file names in a directory that may not exist. Both report
//! absence as `Ok(None)` so callers can decide whether missing is fatal;
//! every other I/O failure is propagated.

use std::io;
use std::path::Path;

use regex::Regex;

pub trait Storage {
    /// File contents, or `None` when the file does not exist.
    fn read(&self, path: &str) -> io::Result<Option<Vec<u8>>>;

    /// Names of entries in `path` matching `expression`, or `None` when the
    /// directory does not exist.
    fn list(&self, path: &str, expression: &Regex) -> io::Result<Option<Vec<String>>>;
}

/// Storage over the local filesystem.
pub struct LocalStorage;

impl Storage for LocalStorage {
    fn read(&self, path: &str) -> io::Result<Option<Vec<u8>>> {
        match std::fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn list(&self, path: &str, expression: &Regex) -> io::Result<Option<Vec<String>>> {
        let entries = match std::fs::read_dir(Path::new(path)) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err),
        };

        let mut names = Vec::new();
        for entry in entries {
            let name = entry?.file_name();
            if let Some(name) = name.to_str()
                && expression.is_match(name)
            {
                names.push(name.to_string());
            }
        }
        Ok(Some(names))
    }
}
