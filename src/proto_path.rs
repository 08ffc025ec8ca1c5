//! `--proto_path` entries.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::root::normalize;
use crate::Error;

/// A single `--proto_path` value.
///
/// protoc accepts either a directory or a `virtual=real` pair that maps the
/// real path (a directory or a single file) to a virtual location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtoPath {
    /// A plain directory.
    Dir(PathBuf),
    /// A `virtual=real` mapping.
    Mapped { virtual_path: PathBuf, real: PathBuf },
}

impl ProtoPath {
    /// Parse an entry, splitting on the first `=`.
    pub fn parse(entry: &str) -> Self {
        match entry.split_once('=') {
            Some((virtual_path, real)) => Self::Mapped {
                virtual_path: PathBuf::from(virtual_path),
                real: PathBuf::from(real),
            },
            None => Self::Dir(PathBuf::from(entry)),
        }
    }

    /// Returns true if the entry refers to something on disk.
    ///
    /// A plain entry must be a directory; the real side of a mapping only has
    /// to exist.
    pub fn exists(&self) -> bool {
        match self {
            Self::Dir(dir) => dir.is_dir(),
            Self::Mapped { real, .. } => real.exists(),
        }
    }

    /// The normalized directory this entry contributes to root inference.
    ///
    /// Mappings never do: their files are addressed by virtual name.
    pub fn root_candidate(&self) -> Option<PathBuf> {
        match self {
            Self::Dir(dir) => Some(normalize(dir)),
            Self::Mapped { .. } => None,
        }
    }

    /// The `--proto_path=` flag for this entry.
    pub fn to_flag(&self) -> String {
        format!("--proto_path={self}")
    }
}

impl From<&Path> for ProtoPath {
    fn from(path: &Path) -> Self {
        Self::Dir(path.to_path_buf())
    }
}

impl fmt::Display for ProtoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dir(dir) => write!(f, "{}", dir.display()),
            Self::Mapped { virtual_path, real } => {
                write!(f, "{}={}", virtual_path.display(), real.display())
            }
        }
    }
}

/// Check every entry of `option`, reporting all missing ones together.
pub fn ensure_proto_path_list(option: &'static str, entries: &[ProtoPath]) -> Result<(), Error> {
    let invalid: Vec<String> = entries
        .iter()
        .filter(|entry| !entry.exists())
        .map(ToString::to_string)
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(Error::InvalidProtoPaths {
            option,
            entries: invalid,
        })
    }
}

/// Split a list option given as a single string on commas and/or whitespace.
pub fn split_string_list(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
