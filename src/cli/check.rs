//! Parse and build DataLisp sources

use super::CliError;
use crate::{logger::TracingLogger, Container, DataLisp};

/// Options for the check, generate and dump commands
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The DataLisp source text
    pub source: String,
    /// Only parse, don't build
    pub syntax_only: bool,
    /// Start without the standard library
    pub no_stdlib: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub struct CheckResult {
    /// Built top-level groups, empty for a syntax-only check
    pub container: Container,
    pub errors: usize,
    pub warnings: usize,
}

impl CheckResult {
    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }

    /// Fails with [`CliError::SourceErrors`] when errors were reported.
    pub fn into_container(self) -> Result<Container, CliError> {
        if self.is_clean() {
            Ok(self.container)
        } else {
            Err(CliError::SourceErrors {
                errors: self.errors,
                warnings: self.warnings,
            })
        }
    }
}

fn driver<'a>(logger: &'a TracingLogger, options: &CheckOptions) -> DataLisp<'a> {
    if options.no_stdlib {
        DataLisp::without_stdlib(logger)
    } else {
        DataLisp::new(logger)
    }
}

/// Execute a check operation, logging diagnostics through `tracing`
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let logger = TracingLogger::new();
    let mut dl = driver(&logger, options);
    dl.parse(&options.source)?;

    let mut container = Container::new();
    if !options.syntax_only {
        dl.build(&mut container)?;
    }

    Ok(CheckResult {
        container,
        errors: logger.error_count(),
        warnings: logger.warning_count(),
    })
}

/// Parse the source and return its syntax-tree trace
pub fn execute_dump(options: &CheckOptions) -> Result<String, CliError> {
    let logger = TracingLogger::new();
    let mut dl = driver(&logger, options);
    dl.parse(&options.source)?;
    Ok(dl.dump())
}

/// Build the source and regenerate it as text
pub fn execute_generate(options: &CheckOptions) -> Result<String, CliError> {
    let container = execute_check(options)?.into_container()?;
    Ok(DataLisp::generate(&container))
}
