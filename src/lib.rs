//! `protoc-command` runs `protoc` over a directory of `.proto` files.
//!
//! It finds the files, works out which `--proto_path` they should be named
//! relative to, and invokes protoc with the resulting command line.
//!
//! # Example
//!
//! ```rust,no_run
//! // In build.rs
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     protoc_command::generate("proto", "python", "gen")?;
//!     Ok(())
//! }
//! ```
//!
//! # Proto root inference
//!
//! protoc identifies every file by its path relative to the `--proto_path` it
//! was found under. When the source directory sits inside one of the search
//! paths, files are passed relative to the *shortest* enclosing search path,
//! so the names protoc records match the names used in `import` statements:
//!
//! ```rust,no_run
//! fn main() -> Result<(), protoc_command::Error> {
//!     // proto/api/v1/service.proto is compiled as api/v1/service.proto
//!     let config = protoc_command::Config::builder()
//!         .source_dir("proto/api")
//!         .proto_path("proto")
//!         .proto_path("third_party")
//!         .output_dir("gen")
//!         .build()?;
//!     assert_eq!(config.proto_root_path(), std::path::Path::new("proto"));
//!
//!     config.generate("cpp", &[])?;
//!     Ok(())
//! }
//! ```
//!
//! # Locating protoc
//!
//! An explicitly configured path is used first, then the `PROTOC`
//! environment variable, then a search of `PATH`.

mod config;
pub mod discover;
mod error;
pub mod options;
mod proto_path;
mod protoc;
pub mod root;

pub use config::{Config, ConfigBuilder, ProtoPathArg};
pub use error::Error;
pub use options::Options;
pub use proto_path::ProtoPath;

use std::path::Path;

/// Generate `language` sources for every `.proto` file under `source_dir`.
///
/// # Arguments
/// * `source_dir` - Directory searched recursively for `.proto` files
/// * `language` - protoc output language, as in `--<language>_out`
/// * `output_dir` - Existing directory that receives the generated code
pub fn generate(
    source_dir: impl AsRef<Path>,
    language: &str,
    output_dir: impl AsRef<Path>,
) -> Result<(), Error> {
    Config::builder()
        .source_dir(source_dir)
        .output_dir(output_dir)
        .build()?
        .generate(language, &[])
}
