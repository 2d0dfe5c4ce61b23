//! File references inside parameter values
//!
//! A string value `@path/to/file` is replaced by the contents of that file,
//! and `-@path/to/file` by its whitespace-trimmed contents. Paths are
//! resolved against the resource directory and may not leave it.

use serde_json::{Map, Value};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, error};

use crate::error::{CoreError, Result};

/// A parsed `@` / `-@` file reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReference {
    path: String,
    strip: bool,
}

impl FileReference {
    /// Parse a parameter value; `None` if it is not a file reference
    pub fn parse(value: &str) -> Option<Self> {
        if let Some(path) = value.strip_prefix('@') {
            Some(Self::new(path, false))
        } else {
            value
                .strip_prefix("-@")
                .map(|path| Self::new(path, true))
        }
    }

    pub fn new(path: impl Into<String>, strip: bool) -> Self {
        Self {
            path: path.into(),
            strip,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether contents are trimmed before injection
    pub fn strip(&self) -> bool {
        self.strip
    }

    /// Resolve the reference to a regular file inside `bound`
    pub fn resolve(&self, bound: &Path) -> Result<PathBuf> {
        let bound = std::path::absolute(bound).map_err(|source| CoreError::Io {
            path: bound.to_path_buf(),
            source,
        })?;
        let bound = normalize(&bound);

        let relative = self.path.strip_prefix('/').unwrap_or(&self.path);
        let target = normalize(&bound.join(relative));

        if !target.starts_with(&bound) {
            return Err(CoreError::PathEscape(target));
        }
        if !target.is_file() {
            return Err(CoreError::FileNotFound(target));
        }

        Ok(target)
    }

    /// Read the referenced file, trimming it for `-@` references
    pub fn contents(&self, bound: &Path) -> Result<String> {
        let path = self.resolve(bound)?;
        let data = std::fs::read_to_string(&path).map_err(|source| CoreError::Io {
            path: path.clone(),
            source,
        })?;

        if self.strip {
            Ok(data.trim().to_string())
        } else {
            Ok(data)
        }
    }
}

/// Lexically remove `.` and `..` components without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Replace every file reference in `value` with the file contents
///
/// Object keys are left alone. A reference that cannot be resolved or read
/// is logged and kept as the original string.
pub fn inject_file_contents(value: &Value, bound: &Path) -> Value {
    match value {
        Value::String(s) => match FileReference::parse(s) {
            Some(reference) => match reference.contents(bound) {
                Ok(contents) => {
                    debug!(
                        "Expanded `{}` from file reference `{}`",
                        s,
                        reference.path()
                    );
                    Value::String(contents)
                }
                Err(e) => {
                    error!("Error injecting file contents for data `{}`: {}", s, e);
                    value.clone()
                }
            },
            None => value.clone(),
        },
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| inject_file_contents(item, bound))
                .collect(),
        ),
        Value::Object(map) => Value::Object(inject_map(map, bound)),
        other => other.clone(),
    }
}

/// [`inject_file_contents`] for a top-level parameter map
pub fn inject_map(map: &Map<String, Value>, bound: &Path) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| (key.clone(), inject_file_contents(value, bound)))
        .collect()
}
