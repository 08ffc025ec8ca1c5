//! Options loaded from a TOML file.
//!
//! ```toml
//! source_dir = "proto/src"
//! output_dir = "gen"
//! include_dirs = "proto/vendor, proto/common"
//! extra_proto_paths = ["third_party/googleapis"]
//! recurse = false
//! ```
//!
//! Every key is optional. List keys take either an array or a single string
//! split on commas and whitespace.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::ConfigBuilder;
use crate::proto_path::split_string_list;
use crate::Error;

/// Option values read from a file, applied on top of builder defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Options {
    pub source_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub proto_root_path: Option<PathBuf>,
    #[serde(default)]
    pub include_dirs: StringList,
    #[serde(default)]
    pub proto_paths: StringList,
    #[serde(default)]
    pub extra_proto_paths: StringList,
    pub proto_files: Option<StringList>,
    pub recurse: Option<bool>,
    pub protoc: Option<PathBuf>,
}

/// A list option written as an array or as one delimited string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StringList {
    Many(Vec<String>),
    One(String),
}

impl Default for StringList {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl StringList {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Self::Many(items) => items.clone(),
            Self::One(value) => split_string_list(value),
        }
    }
}

impl Options {
    /// Parse options from TOML text.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, Error> {
        toml::from_str(text).map_err(|source| Error::OptionsFile {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Read and parse an options file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text, path)
    }

    /// Apply every value present in the file to `builder`.
    pub fn apply(&self, builder: &mut ConfigBuilder) {
        if let Some(dir) = &self.source_dir {
            builder.source_dir(dir);
        }
        if let Some(dir) = &self.output_dir {
            builder.output_dir(dir);
        }
        if let Some(dir) = &self.proto_root_path {
            builder.proto_root_path(dir);
        }
        for entry in self.include_dirs.to_vec() {
            builder.include_dir(entry);
        }
        for entry in self.proto_paths.to_vec() {
            builder.proto_path(entry);
        }
        for entry in self.extra_proto_paths.to_vec() {
            builder.extra_proto_path(entry);
        }
        if let Some(files) = &self.proto_files {
            builder.proto_files(files.to_vec());
        }
        if let Some(recurse) = self.recurse {
            builder.recurse(recurse);
        }
        if let Some(protoc) = &self.protoc {
            builder.protoc(protoc);
        }
    }
}
