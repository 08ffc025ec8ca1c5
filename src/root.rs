//! Inference of the proto root path.
//!
//! If the source directory is a subdirectory of any `--proto_path` entry, the
//! shortest such entry (and so the longest relative `.proto` file names) must
//! be used. Consider:
//!
//! ```text
//! source_dir  = a/b/c
//! proto_paths = [a/b, x/y]
//! ```
//!
//! `a/b/c/d/foo.proto` has to be passed to protoc as `c/d/foo.proto`, not
//! `d/foo.proto`. Otherwise an `import "c/d/foo.proto";` elsewhere produces a
//! second descriptor for the same file and protoc rejects every definition in
//! it as a duplicate.

use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path.
///
/// Drops `.` segments, collapses `name/..` pairs, and removes repeated and
/// trailing separators. Symlinks are not resolved. An empty result becomes
/// `.`.
pub fn normalize(path: impl AsRef<Path>) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`.
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            _ => out.push(component),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Compute the proto root for `source_dir` from an ordered list of candidates.
///
/// Both inputs are expected to be normalized. A candidate replaces the
/// current root when the current root starts with it, so the shortest
/// matching candidate wins. Returns `source_dir` itself when nothing matches.
pub fn compute_root<'a, I>(source_dir: &Path, candidates: I) -> PathBuf
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut root = source_dir;
    for candidate in candidates {
        if root.starts_with(candidate) {
            root = candidate;
        }
    }
    root.to_path_buf()
}
