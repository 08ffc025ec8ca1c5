//! Command-line front end for `protoc-command`.

use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use protoc_command::options::StringList;
use protoc_command::{ConfigBuilder, Options};

/// Run protoc over every .proto file in a directory.
#[derive(Parser, Debug)]
#[command(name = "protoc-command", version, about)]
struct Cli {
    /// TOML file supplying option defaults; flags override it.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory searched for .proto files.
    #[arg(long, value_name = "DIR")]
    source_dir: Option<PathBuf>,

    /// Directory that receives generated code [default: .]
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Proto root to use instead of inferring one.
    #[arg(long, value_name = "DIR")]
    proto_root_path: Option<PathBuf>,

    /// Include directory; comes first among the search paths.
    #[arg(short = 'I', long = "include-dir", value_name = "DIR", value_delimiter = ',')]
    include_dirs: Vec<String>,

    /// Additional --proto_path entry (DIR or VIRTUAL=REAL).
    #[arg(long = "proto-path", value_name = "PATH", value_delimiter = ',')]
    proto_paths: Vec<String>,

    /// Additional path used to resolve imports.
    #[arg(long = "extra-proto-path", value_name = "PATH", value_delimiter = ',')]
    extra_proto_paths: Vec<String>,

    /// Also compile files in subdirectories of the source directory.
    #[arg(long, overrides_with = "no_recurse")]
    recurse: bool,

    /// Only compile files directly inside the source directory.
    #[arg(long, overrides_with = "recurse")]
    no_recurse: bool,

    /// Path to the protoc executable.
    #[arg(long, value_name = "PATH")]
    protoc: Option<PathBuf>,

    /// Output language passed as --<LANG>_out.
    #[arg(long, default_value = "python")]
    lang: String,

    /// Print the protoc command line instead of running it.
    #[arg(long)]
    dry_run: bool,

    /// Extra arguments passed to protoc after the output flag.
    #[arg(last = true, value_name = "PROTOC_ARGS")]
    protoc_args: Vec<OsString>,
}

impl Cli {
    /// Options from `--config`, with every flag given on the command line
    /// replacing the file's value for that option.
    fn options(&self) -> anyhow::Result<Options> {
        let mut options = match &self.config {
            Some(path) => Options::from_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => Options::default(),
        };

        if let Some(dir) = &self.source_dir {
            options.source_dir = Some(dir.clone());
        }
        if let Some(dir) = &self.output_dir {
            options.output_dir = Some(dir.clone());
        }
        if let Some(dir) = &self.proto_root_path {
            options.proto_root_path = Some(dir.clone());
        }
        if !self.include_dirs.is_empty() {
            options.include_dirs = StringList::Many(self.include_dirs.clone());
        }
        if !self.proto_paths.is_empty() {
            options.proto_paths = StringList::Many(self.proto_paths.clone());
        }
        if !self.extra_proto_paths.is_empty() {
            options.extra_proto_paths = StringList::Many(self.extra_proto_paths.clone());
        }
        if self.recurse {
            options.recurse = Some(true);
        } else if self.no_recurse {
            options.recurse = Some(false);
        }
        if let Some(protoc) = &self.protoc {
            options.protoc = Some(protoc.clone());
        }

        Ok(options)
    }

    fn builder(&self) -> anyhow::Result<ConfigBuilder> {
        let mut builder = ConfigBuilder::new();
        self.options()?.apply(&mut builder);
        Ok(builder)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();
    let config = cli.builder()?.build().context("invalid options")?;

    let mut mode_args = vec![config.language_out(&cli.lang)];
    mode_args.extend(cli.protoc_args.iter().cloned());

    if cli.dry_run {
        let protoc = config
            .protoc()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "protoc".to_string());
        let args: Vec<String> = config
            .protoc_args(&mode_args)
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        println!("{} {}", protoc, args.join(" "));
        return Ok(());
    }

    config.run_protoc(&mode_args).context("protoc run failed")?;
    Ok(())
}
