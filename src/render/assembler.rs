//! Command-line assembler shared by all render backends.

use std::path::Path;

use crate::render::quote::shell_quote;
use crate::resolve::absolutize;
use crate::signature::{FlagDescriptor, OptionValue, PositionalArg, ValueKind};

/// Render one flag: bare `--long` for booleans, `--long value` otherwise.
pub fn render_flag(flag: &FlagDescriptor, value: &OptionValue, cwd: &Path) -> String {
    match flag.kind() {
        ValueKind::Boolean => format!("--{}", flag.long),
        ValueKind::Scalar => format!("--{} {}", flag.long, shell_quote(&value.to_string())),
        ValueKind::Path(_) => format!(
            "--{} {}",
            flag.long,
            shell_quote(&absolutize(&value.to_string(), cwd))
        ),
    }
}

/// Builder for a space-joined command line. Empty segments are dropped.
#[derive(Debug, Clone, Default)]
pub struct CommandLine {
    parts: Vec<String>,
}

impl CommandLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a literal word or pre-rendered fragment.
    pub fn push(mut self, part: impl Into<String>) -> Self {
        let part = part.into();
        if !part.is_empty() {
            self.parts.push(part);
        }
        self
    }

    /// Append pre-rendered flags in order.
    pub fn with_flags(mut self, flags: Vec<String>) -> Self {
        self.parts.extend(flags.into_iter().filter(|f| !f.is_empty()));
        self
    }

    /// Append non-blank positional values in declared order.
    ///
    /// Path-typed values are made absolute against `cwd`, like path flags.
    pub fn with_positionals(mut self, positionals: &[PositionalArg], cwd: &Path) -> Self {
        self.parts.extend(
            positionals
                .iter()
                .filter(|a| !a.is_blank())
                .map(|a| match a.kind {
                    ValueKind::Path(_) => shell_quote(&absolutize(&a.value, cwd)),
                    ValueKind::Boolean | ValueKind::Scalar => shell_quote(&a.value),
                }),
        );
        self
    }

    pub fn build(self) -> String {
        self.parts.join(" ")
    }
}
