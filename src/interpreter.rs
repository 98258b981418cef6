//! Interpreter: ties binding and resolution together for one invocation.

use std::path::PathBuf;

use thiserror::Error;

use crate::args::{bind, is_help_request, ValidationError};
use crate::error::ConfigurationError;
use crate::resolve::{Overrides, ResolvedOptionSet};
use crate::signature::SignatureTable;

/// Immutable per-call description of what is being rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable inside the target environment.
    pub binary: String,
    /// Subcommand passed to the binary.
    pub command: String,
    /// Task name, used in batch job names.
    pub task: String,
    /// Container image for docker and batch targets.
    pub image: String,
}

impl Invocation {
    pub fn new(
        binary: impl Into<String>,
        command: impl Into<String>,
        task: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            binary: binary.into(),
            command: command.into(),
            task: task.into(),
            image: image.into(),
        }
    }
}

/// Outcome of interpreting argv.
#[derive(Debug, Clone, PartialEq)]
pub enum Interpretation {
    /// `-h`/`--help` was present; nothing was resolved.
    Help,
    /// Flags and arguments resolved.
    Resolved(ResolvedOptionSet),
}

/// Errors raised while interpreting argv.
#[derive(Debug, Error)]
pub enum InterpretError {
    #[error("Invalid arguments: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Failed to read current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

/// Interprets argv for one command signature.
#[derive(Debug, Clone)]
pub struct Interpreter<'a> {
    table: &'a SignatureTable,
    cwd: Option<PathBuf>,
}

impl<'a> Interpreter<'a> {
    pub fn new(table: &'a SignatureTable) -> Self {
        Self { table, cwd: None }
    }

    /// Resolve against `cwd` instead of the process working directory.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Interpret argv with caller overrides.
    ///
    /// Help short-circuits before any binding, so overrides and invalid flags
    /// are irrelevant when `-h`/`--help` appears.
    pub fn interpret(
        &self,
        args: &[String],
        overrides: &Overrides,
    ) -> Result<Interpretation, InterpretError> {
        if is_help_request(args) {
            tracing::debug!("Help requested, skipping resolution");
            return Ok(Interpretation::Help);
        }

        let parsed = bind(self.table, args)?;
        let cwd = match &self.cwd {
            Some(cwd) => cwd.clone(),
            None => std::env::current_dir().map_err(InterpretError::CurrentDir)?,
        };

        let resolved = ResolvedOptionSet::build(self.table, &parsed, overrides, &cwd)?;
        Ok(Interpretation::Resolved(resolved))
    }
}
