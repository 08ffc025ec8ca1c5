//! Error types for protoc-command.

use std::io;
use std::path::PathBuf;

/// Errors that can occur while configuring or running protoc.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required option was never set.
    #[error("missing required option `{0}`")]
    MissingOption(&'static str),

    /// An option that must name a directory does not.
    #[error("{option} '{}' does not exist or is not a directory", .path.display())]
    NotADirectory { option: &'static str, path: PathBuf },

    /// One or more `--proto_path` entries do not exist on disk.
    #[error("invalid {option} entry: {}", .entries.join(", "))]
    InvalidProtoPaths {
        option: &'static str,
        entries: Vec<String>,
    },

    /// The source directory is not nested under the proto root.
    #[error(
        "source_dir {} is not under proto_root_path {}",
        .source_dir.display(),
        .root.display()
    )]
    SourceNotUnderRoot { source_dir: PathBuf, root: PathBuf },

    /// The options file could not be parsed.
    #[error("invalid options file {}: {source}", .path.display())]
    OptionsFile {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// protoc not found.
    #[error("protoc not found. Set PROTOC env var or install protoc.")]
    ProtocNotFound,

    /// protoc could not be started.
    #[error("failed to run {}: {source}", .protoc.display())]
    Spawn {
        protoc: PathBuf,
        #[source]
        source: io::Error,
    },

    /// protoc ran and exited unsuccessfully.
    #[error("protoc failed ({}): {}", exit_description(.code), truncate(.output))]
    ProtocFailed { code: Option<i32>, output: String },

    /// IO error.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Returns true for errors caused by inconsistent or missing options.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingOption(_)
                | Self::NotADirectory { .. }
                | Self::InvalidProtoPaths { .. }
                | Self::SourceNotUnderRoot { .. }
                | Self::OptionsFile { .. }
        )
    }

    /// Returns true for errors raised while locating or running protoc.
    pub fn is_execution(&self) -> bool {
        matches!(
            self,
            Self::ProtocNotFound | Self::Spawn { .. } | Self::ProtocFailed { .. }
        )
    }
}

impl From<walkdir::Error> for Error {
    fn from(e: walkdir::Error) -> Self {
        Self::Io(e.into())
    }
}

fn exit_description(code: &Option<i32>) -> String {
    match *code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Truncate very long protoc output to keep error messages readable.
fn truncate(msg: &str) -> String {
    const MAX_LEN: usize = 1000;
    if msg.len() <= MAX_LEN {
        return msg.to_string();
    }
    let mut end = MAX_LEN;
    while !msg.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated)", &msg[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(Error::MissingOption("source_dir").is_configuration());
        assert!(!Error::MissingOption("source_dir").is_execution());

        let failed = Error::ProtocFailed {
            code: Some(2),
            output: String::new(),
        };
        assert!(failed.is_execution());
        assert!(!failed.is_configuration());

        let io = Error::Io(io::Error::other("boom"));
        assert!(!io.is_configuration());
        assert!(!io.is_execution());
    }

    #[test]
    fn test_protoc_failed_display() {
        let err = Error::ProtocFailed {
            code: Some(2),
            output: "foo.proto:1:1: Expected top-level statement".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "protoc failed (exit code 2): foo.proto:1:1: Expected top-level statement"
        );

        let err = Error::ProtocFailed {
            code: None,
            output: "x".repeat(1500),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("protoc failed (terminated by signal): xxx"));
        assert!(msg.ends_with("... (truncated)"));
    }

    #[test]
    fn test_invalid_proto_paths_display() {
        let err = Error::InvalidProtoPaths {
            option: "include_dirs",
            entries: vec!["missing".to_string(), "v=gone".to_string()],
        };
        assert_eq!(err.to_string(), "invalid include_dirs entry: missing, v=gone");
    }
}
