//! CLI support for datalisp
//!
//! Provides programmatic access to the `datalisp` commands for embedding in
//! other tools.

mod check;
mod convert;

pub use check::{execute_check, execute_dump, execute_generate, CheckOptions, CheckResult};
pub use convert::{container_to_json, json_to_container, ID_KEY, UNKNOWN_ID};

use std::io;

use thiserror::Error;

use crate::{driver::DriverError, logger::TracingLogger, DataLisp};

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No input provided. Pass a file, use --input or pipe to stdin.")]
    NoInput,

    #[error("{errors} error(s) and {warnings} warning(s) reported")]
    SourceErrors { errors: usize, warnings: usize },

    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// Build the source and convert it to JSON text
pub fn execute_to_json(options: &CheckOptions, pretty: bool) -> Result<String, CliError> {
    let container = execute_check(options)?.into_container()?;
    let json = container_to_json(&container);
    let text = if pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };
    Ok(text)
}

/// Convert JSON text to DataLisp source
pub fn execute_from_json(input: &str) -> Result<String, CliError> {
    let json: serde_json::Value = serde_json::from_str(input)?;
    let logger = TracingLogger::new();
    let container = json_to_container(&json, &logger);

    if logger.error_count() > 0 {
        return Err(CliError::SourceErrors {
            errors: logger.error_count(),
            warnings: logger.warning_count(),
        });
    }
    Ok(DataLisp::generate(&container))
}
