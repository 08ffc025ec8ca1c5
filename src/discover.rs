//! Discovery of `.proto` files under a source directory.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::Error;

/// Extension of the files handed to protoc.
const PROTO_EXTENSION: &str = "proto";

/// Find `.proto` files under `source_dir`, relative to `root`.
///
/// Only direct children are considered unless `recurse` is set, in which
/// case files at any depth are found. Symlinks are not followed. `source_dir`
/// and `root` are expected to be normalized, with `source_dir` under `root`.
///
/// A subdirectory that cannot be read is skipped with a warning. Only a
/// failure to read `source_dir` itself is an error.
pub fn find_proto_files(source_dir: &Path, recurse: bool, root: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut walker = WalkDir::new(source_dir).min_depth(1).sort_by_file_name();
    if !recurse {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() > 0 => {
                let path = err.path().unwrap_or(source_dir).to_path_buf();
                tracing::warn!("skipping {}: {}", path.display(), err);
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        if !entry.file_type().is_file() || !is_proto(entry.path()) {
            continue;
        }
        files.push(relative_to_root(entry.path(), root));
    }

    if files.is_empty() {
        tracing::warn!("no .proto files were found under {}", source_dir.display());
    }
    Ok(files)
}

fn is_proto(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(PROTO_EXTENSION)
}

/// Strip the root prefix from a discovered path.
fn relative_to_root(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}
