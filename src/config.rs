//! Configuration for running protoc over a source directory.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::discover::find_proto_files;
use crate::proto_path::{ensure_proto_path_list, ProtoPath};
use crate::root::{compute_root, normalize};
use crate::Error;

/// Builder for [`Config`].
///
/// Holds defaults and overrides; nothing is checked until [`build`] runs a
/// single validation pass.
///
/// [`build`]: ConfigBuilder::build
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    source_dir: Option<PathBuf>,
    output_dir: PathBuf,
    proto_root_path: Option<PathBuf>,
    include_dirs: Vec<ProtoPath>,
    proto_paths: Vec<ProtoPath>,
    extra_proto_paths: Vec<ProtoPath>,
    proto_files: Option<Vec<PathBuf>>,
    recurse: bool,
    protoc: Option<PathBuf>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            source_dir: None,
            output_dir: PathBuf::from("."),
            proto_root_path: None,
            include_dirs: Vec::new(),
            proto_paths: Vec::new(),
            extra_proto_paths: Vec::new(),
            proto_files: None,
            recurse: true,
            protoc: None,
        }
    }
}

impl ConfigBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory searched for `.proto` files. Required.
    pub fn source_dir(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.source_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Directory protoc writes generated code to. Defaults to `.`.
    pub fn output_dir(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.output_dir = path.as_ref().to_path_buf();
        self
    }

    /// Use `path` as the proto root instead of inferring it.
    pub fn proto_root_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.proto_root_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Add an include directory. Include directories come first on the
    /// protoc command line.
    pub fn include_dir(&mut self, entry: impl Into<ProtoPathArg>) -> &mut Self {
        self.include_dirs.push(entry.into().0);
        self
    }

    /// Add a `--proto_path` entry.
    pub fn proto_path(&mut self, entry: impl Into<ProtoPathArg>) -> &mut Self {
        self.proto_paths.push(entry.into().0);
        self
    }

    /// Add an extra path used to resolve imports.
    pub fn extra_proto_path(&mut self, entry: impl Into<ProtoPathArg>) -> &mut Self {
        self.extra_proto_paths.push(entry.into().0);
        self
    }

    /// Compile exactly these files (relative to the proto root) instead of
    /// searching `source_dir`.
    pub fn proto_files<I, P>(&mut self, files: I) -> &mut Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.proto_files = Some(files.into_iter().map(|p| p.as_ref().to_path_buf()).collect());
        self
    }

    /// Whether to search subdirectories of `source_dir`. Defaults to true.
    pub fn recurse(&mut self, recurse: bool) -> &mut Self {
        self.recurse = recurse;
        self
    }

    /// Path to the protoc executable.
    pub fn protoc(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.protoc = Some(path.as_ref().to_path_buf());
        self
    }

    /// Validate the options and produce an immutable [`Config`].
    ///
    /// Resolves the proto root and, unless an explicit file list was given,
    /// discovers the `.proto` files to compile.
    pub fn build(&self) -> Result<Config, Error> {
        let source_dir = self
            .source_dir
            .as_deref()
            .ok_or(Error::MissingOption("source_dir"))?;
        ensure_dirname("source_dir", source_dir)?;
        ensure_dirname("output_dir", &self.output_dir)?;

        ensure_proto_path_list("include_dirs", &self.include_dirs)?;
        ensure_proto_path_list("proto_paths", &self.proto_paths)?;
        ensure_proto_path_list("extra_proto_paths", &self.extra_proto_paths)?;

        let source_dir = normalize(source_dir);
        let proto_root_path = match &self.proto_root_path {
            Some(root) => normalize(root),
            None => {
                let candidates: Vec<PathBuf> = self
                    .search_paths()
                    .filter_map(ProtoPath::root_candidate)
                    .collect();
                let root = compute_root(&source_dir, candidates.iter().map(PathBuf::as_path));
                if root != source_dir {
                    tracing::info!("using computed proto_root_path: {}", root.display());
                }
                root
            }
        };
        ensure_dirname("proto_root_path", &proto_root_path)?;

        if !source_dir.starts_with(&proto_root_path) {
            return Err(Error::SourceNotUnderRoot {
                source_dir,
                root: proto_root_path,
            });
        }

        let proto_files = match &self.proto_files {
            Some(files) => files.clone(),
            None => find_proto_files(&source_dir, self.recurse, &proto_root_path)?,
        };

        let protoc = self
            .protoc
            .clone()
            .or_else(|| std::env::var_os("PROTOC").map(PathBuf::from));

        Ok(Config {
            source_dir,
            output_dir: self.output_dir.clone(),
            proto_root_path,
            proto_paths: self.search_paths().cloned().collect(),
            proto_files,
            protoc,
        })
    }

    /// All search path entries in command-line order.
    fn search_paths(&self) -> impl Iterator<Item = &ProtoPath> {
        self.include_dirs
            .iter()
            .chain(&self.proto_paths)
            .chain(&self.extra_proto_paths)
    }
}

/// Argument accepted by the `--proto_path` builder methods.
///
/// Strings are parsed so `virtual=real` mappings can be given directly;
/// paths are always plain directories.
#[derive(Debug, Clone)]
pub struct ProtoPathArg(ProtoPath);

impl From<ProtoPath> for ProtoPathArg {
    fn from(path: ProtoPath) -> Self {
        Self(path)
    }
}

impl From<&str> for ProtoPathArg {
    fn from(entry: &str) -> Self {
        Self(ProtoPath::parse(entry))
    }
}

impl From<String> for ProtoPathArg {
    fn from(entry: String) -> Self {
        Self(ProtoPath::parse(&entry))
    }
}

impl From<&Path> for ProtoPathArg {
    fn from(path: &Path) -> Self {
        Self(ProtoPath::from(path))
    }
}

impl From<PathBuf> for ProtoPathArg {
    fn from(path: PathBuf) -> Self {
        Self(ProtoPath::Dir(path))
    }
}

impl From<&PathBuf> for ProtoPathArg {
    fn from(path: &PathBuf) -> Self {
        Self(ProtoPath::Dir(path.clone()))
    }
}

fn ensure_dirname(option: &'static str, path: &Path) -> Result<(), Error> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(Error::NotADirectory {
            option,
            path: path.to_path_buf(),
        })
    }
}

/// Validated settings for a single protoc run.
#[derive(Debug, Clone)]
pub struct Config {
    source_dir: PathBuf,
    output_dir: PathBuf,
    proto_root_path: PathBuf,
    proto_paths: Vec<ProtoPath>,
    proto_files: Vec<PathBuf>,
    protoc: Option<PathBuf>,
}

impl Config {
    /// Start building a new configuration.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Normalized source directory.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Output directory for generated code.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Resolved proto root.
    pub fn proto_root_path(&self) -> &Path {
        &self.proto_root_path
    }

    /// Search path entries passed after the root: include directories, proto
    /// paths, then extra proto paths.
    pub fn proto_paths(&self) -> &[ProtoPath] {
        &self.proto_paths
    }

    /// Files to compile, relative to the proto root.
    pub fn proto_files(&self) -> &[PathBuf] {
        &self.proto_files
    }

    /// Explicitly configured protoc, from the builder or `PROTOC`.
    pub fn protoc(&self) -> Option<&Path> {
        self.protoc.as_deref()
    }

    /// Full protoc argument list for the given mode flags.
    ///
    /// One `--proto_path` per search path (root first), then `mode_args`,
    /// then the root-relative files.
    pub fn protoc_args<S: Into<OsString> + Clone>(&self, mode_args: &[S]) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        args.push(ProtoPath::Dir(self.proto_root_path.clone()).to_flag().into());
        args.extend(self.proto_paths.iter().map(|p| OsString::from(p.to_flag())));
        args.extend(mode_args.iter().cloned().map(Into::into));
        args.extend(self.proto_files.iter().map(|f| f.as_os_str().to_owned()));
        args
    }

    /// Run protoc with the given mode flags (e.g. `--cpp_out=gen`).
    pub fn run_protoc<S: Into<OsString> + Clone>(&self, mode_args: &[S]) -> Result<(), Error> {
        let protoc = crate::protoc::resolve_protoc(self.protoc.as_deref())?;
        crate::protoc::invoke_protoc(&protoc, &self.protoc_args(mode_args))
    }

    /// Flag selecting `language` output into the output directory.
    pub fn language_out(&self, language: &str) -> OsString {
        let mut flag = OsString::from(format!("--{language}_out="));
        flag.push(self.output_dir.as_os_str());
        flag
    }

    /// Generate `language` sources into the output directory.
    ///
    /// `extra_args` follow the output flag on the command line.
    pub fn generate(&self, language: &str, extra_args: &[OsString]) -> Result<(), Error> {
        let mut mode_args = vec![self.language_out(language)];
        mode_args.extend_from_slice(extra_args);
        self.run_protoc(&mode_args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "syntax = \"proto3\";\n").unwrap();
    }

    fn args_as_strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_missing_source_dir() {
        let err = ConfigBuilder::new().build().unwrap_err();
        assert!(matches!(err, Error::MissingOption("source_dir")));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_nested_source_dir() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        touch(base, "a/b/c/d/foo.proto");
        fs::create_dir_all(base.join("x/y")).unwrap();

        let config = Config::builder()
            .source_dir(base.join("a/b/c"))
            .output_dir(base)
            .proto_path(base.join("a/b"))
            .proto_path(base.join("x/y"))
            .build()
            .unwrap();

        assert_eq!(config.proto_root_path(), base.join("a/b"));
        assert_eq!(config.proto_files(), &[PathBuf::from("c/d/foo.proto")]);
    }

    #[test]
    fn test_unmatched_source_dir_is_root() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        touch(base, "protos/sub/foo.proto");
        touch(base, "protos/bar.proto");
        fs::create_dir_all(base.join("other")).unwrap();

        let config = Config::builder()
            .source_dir(base.join("protos/"))
            .output_dir(base)
            .include_dir(base.join("other"))
            .build()
            .unwrap();

        assert_eq!(config.proto_root_path(), base.join("protos"));
        assert_eq!(
            config.proto_files(),
            &[PathBuf::from("bar.proto"), PathBuf::from("sub/foo.proto")]
        );
    }

    #[test]
    fn test_no_recurse() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        touch(base, "protos/sub/foo.proto");
        touch(base, "protos/bar.proto");

        let config = Config::builder()
            .source_dir(base.join("protos"))
            .output_dir(base)
            .recurse(false)
            .build()
            .unwrap();

        assert_eq!(config.proto_files(), &[PathBuf::from("bar.proto")]);
    }

    #[test]
    fn test_no_files_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::builder()
            .source_dir(dir.path())
            .output_dir(dir.path())
            .build()
            .unwrap();
        assert!(config.proto_files().is_empty());
    }

    #[test]
    fn test_missing_search_path_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = Config::builder()
            .source_dir(dir.path())
            .output_dir(dir.path())
            .extra_proto_path(missing.clone())
            .build()
            .unwrap_err();

        assert!(err.is_configuration());
        match err {
            Error::InvalidProtoPaths { option, entries } => {
                assert_eq!(option, "extra_proto_paths");
                assert_eq!(entries, vec![missing.display().to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_output_dir_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::builder()
            .source_dir(dir.path())
            .output_dir(dir.path().join("gen"))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::NotADirectory {
                option: "output_dir",
                ..
            }
        ));
    }

    #[test]
    fn test_explicit_root_must_contain_source() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        fs::create_dir_all(base.join("protos")).unwrap();
        fs::create_dir_all(base.join("elsewhere")).unwrap();

        let err = Config::builder()
            .source_dir(base.join("protos"))
            .output_dir(base)
            .proto_root_path(base.join("elsewhere"))
            .build()
            .unwrap_err();

        assert!(err.is_configuration());
        assert!(matches!(err, Error::SourceNotUnderRoot { .. }));
    }

    #[test]
    fn test_explicit_root_is_honored() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        touch(base, "a/b/c/foo.proto");

        let config = Config::builder()
            .source_dir(base.join("a/b/c"))
            .output_dir(base)
            .proto_root_path(base.join("a"))
            .build()
            .unwrap();

        assert_eq!(config.proto_root_path(), base.join("a"));
        assert_eq!(config.proto_files(), &[PathBuf::from("b/c/foo.proto")]);
    }

    #[test]
    fn test_explicit_files_skip_discovery() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "found.proto");

        let config = Config::builder()
            .source_dir(dir.path())
            .output_dir(dir.path())
            .proto_files(["given.proto"])
            .build()
            .unwrap();

        assert_eq!(config.proto_files(), &[PathBuf::from("given.proto")]);
    }

    #[test]
    fn test_mapped_entries_do_not_become_root() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        touch(base, "a/b/foo.proto");

        let config = Config::builder()
            .source_dir(base.join("a/b"))
            .output_dir(base)
            .proto_path(format!("virt={}", base.join("a").display()))
            .build()
            .unwrap();

        assert_eq!(config.proto_root_path(), base.join("a/b"));
    }

    #[test]
    fn test_protoc_args_order() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        touch(base, "root/src/foo.proto");
        fs::create_dir_all(base.join("inc")).unwrap();
        fs::create_dir_all(base.join("extra")).unwrap();

        let config = Config::builder()
            .source_dir(base.join("root/src"))
            .output_dir(base)
            .proto_path(base.join("root"))
            .include_dir(base.join("inc"))
            .extra_proto_path(base.join("extra"))
            .build()
            .unwrap();

        let args = config.protoc_args(&["--cpp_out=gen"]);
        let b = base.display();
        assert_eq!(
            args_as_strings(&args),
            vec![
                format!("--proto_path={b}/root"),
                format!("--proto_path={b}/inc"),
                format!("--proto_path={b}/root"),
                format!("--proto_path={b}/extra"),
                "--cpp_out=gen".to_string(),
                "src/foo.proto".to_string(),
            ]
        );
    }

    #[test]
    fn test_language_out() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::builder()
            .source_dir(dir.path())
            .output_dir(dir.path())
            .build()
            .unwrap();
        assert_eq!(
            config.language_out("python"),
            OsString::from(format!("--python_out={}", dir.path().display()))
        );
    }
}
