//! Protoc invocation utilities.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::Error;

/// Resolve the protoc executable.
///
/// An explicit path is used as-is; otherwise protoc is looked up on `PATH`.
pub fn resolve_protoc(explicit: Option<&Path>) -> Result<PathBuf, Error> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => which::which("protoc").map_err(|_| Error::ProtocNotFound),
    }
}

/// Run protoc with `args` and wait for it to finish.
///
/// Output is captured; a non-zero exit becomes [`Error::ProtocFailed`]
/// carrying whatever protoc printed.
pub fn invoke_protoc(protoc: &Path, args: &[OsString]) -> Result<(), Error> {
    tracing::debug!("running {} {}", protoc.display(), display_args(args));

    let output = Command::new(protoc)
        .args(args)
        .output()
        .map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => Error::ProtocNotFound,
            _ => Error::Spawn {
                protoc: protoc.to_path_buf(),
                source,
            },
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
        // Combine stdout and stderr for full error context
        let combined = if stdout.is_empty() {
            stderr.into_owned()
        } else if stderr.is_empty() {
            stdout.into_owned()
        } else {
            format!("{}\n{}", stdout, stderr)
        };
        return Err(Error::ProtocFailed {
            code: output.status.code(),
            output: combined,
        });
    }

    for line in stderr.lines().filter(|line| !line.trim().is_empty()) {
        tracing::warn!("protoc: {line}");
    }
    Ok(())
}

fn display_args(args: &[OsString]) -> String {
    args.iter()
        .map(|arg| arg.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
