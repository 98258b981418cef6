//! Default-path resolver: runtime defaults for path flags and arguments.

use std::path::Path;

use crate::error::ConfigurationError;
use crate::signature::{DefaultAction, PositionalArg, SignatureTable};

/// Output of [`resolve_default_paths`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultPaths {
    /// Computed values keyed by target variable.
    pub values: Vec<(String, String)>,
    /// Flag names that received a computed value, in declaration order.
    pub defaulted: Vec<String>,
    /// Positional arguments with computed defaults filled in.
    pub positionals: Vec<PositionalArg>,
}

/// Fill in `default-action` values for unset path flags and positionals.
///
/// `empty_path_flags` names the directory flags that received no explicit
/// value. Afterwards the positional sequence is checked for contiguity: once
/// a blank argument is seen, a later non-blank one is rejected.
pub fn resolve_default_paths(
    table: &SignatureTable,
    empty_path_flags: &[String],
    positionals: Vec<PositionalArg>,
    cwd: &Path,
) -> Result<DefaultPaths, ConfigurationError> {
    let cwd = cwd.to_string_lossy().into_owned();
    let mut out = DefaultPaths::default();

    for flag in table.flags() {
        if !empty_path_flags.iter().any(|f| f == &flag.name) {
            continue;
        }
        match flag.default_action {
            Some(DefaultAction::SetCwd) => {
                tracing::debug!(flag = %flag.name, cwd = %cwd, "Defaulted flag to working directory");
                out.values.push((flag.target(), cwd.clone()));
                out.defaulted.push(flag.name.clone());
            }
            Some(DefaultAction::Unsupported) => {
                tracing::warn!(flag = %flag.name, "Ignoring unsupported default-action");
            }
            None => {}
        }
    }

    out.positionals = positionals
        .into_iter()
        .map(|mut arg| {
            if arg.is_blank() && arg.default_action == Some(DefaultAction::SetCwd) {
                tracing::debug!(arg = %arg.name, cwd = %cwd, "Defaulted argument to working directory");
                arg.value = cwd.clone();
            }
            arg
        })
        .collect();

    check_contiguous(&out.positionals)?;
    Ok(out)
}

/// Reject a non-blank positional argument following a blank one.
pub fn check_contiguous(positionals: &[PositionalArg]) -> Result<(), ConfigurationError> {
    let mut blank = false;
    for arg in positionals {
        if arg.is_blank() {
            blank = true;
            continue;
        }
        if blank {
            return Err(ConfigurationError::NonContiguousPositional {
                name: arg.name.clone(),
            });
        }
    }
    Ok(())
}
