//! Lazily-read source text for one extraction call.

use crate::errors::{ApiDeltaError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Source files read on first access and kept for the rest of the call.
///
/// Node spans from the parser are resolved against this text, so each file
/// is read from disk exactly once no matter how many passes touch it.
#[derive(Debug, Default)]
pub struct SourceCache {
    texts: HashMap<PathBuf, String>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the text of `path`, reading it on first request.
    pub fn get(&mut self, path: &Path) -> Result<&str> {
        if !self.texts.contains_key(path) {
            let text =
                std::fs::read_to_string(path).map_err(|e| ApiDeltaError::io(path, e))?;
            self.texts.insert(path.to_path_buf(), text);
        }
        self.texts
            .get(path)
            .map(String::as_str)
            .ok_or_else(|| ApiDeltaError::Internal {
                message: format!("source cache lost {}", path.display()),
            })
    }

    /// Number of files read so far
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}
