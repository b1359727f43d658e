//! The single error type returned by every `packroute` subcommand.
//!
//! Variants box nothing large: `clippy::result_large_err` is denied and most
//! helpers return `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use packroute_core::OptimizeError;
use packroute_core::synthetic::SyntheticError;
use thiserror::Error;

/// Failures surfaced to the `packroute` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Clap rejected the command line (also used for `--help`).
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Merging config files, environment and flags failed.
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// No layer supplied a required option.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name.
        field: &'static str,
        /// Environment variable that can provide it.
        env: &'static str,
    },
    /// The request path does not exist.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag name.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// The request path names a directory or other non-file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag name.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// Reading the request path's metadata failed.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag name.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the request file failed.
    #[error("failed to open request at {path:?}: {source}")]
    OpenRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Request JSON could not be decoded or describes an invalid instance.
    #[error("failed to parse request JSON at {path:?}: {source}")]
    ParseRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// The optimizer rejected the request.
    #[error("optimization failed: {0}")]
    Optimize(#[from] OptimizeError),
    /// Synthetic instance generation failed.
    #[error("failed to generate instance: {0}")]
    Generate(#[from] SyntheticError),
    /// Serializing output failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Creating the output file failed.
    #[error("failed to create output file {path:?}: {source}")]
    CreateOutput {
        /// Output path.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Writing output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
