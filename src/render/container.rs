//! Container renderer: `docker run` with host paths mounted onto themselves.

use std::collections::BTreeSet;
use std::fmt;

use crate::interpreter::{Interpretation, Invocation};
use crate::render::assembler::{render_flag, CommandLine};
use crate::render::quote::shell_quote;
use crate::resolve::{absolutize, parent_dir, ResolvedOptionSet};
use crate::signature::{FsKind, SignatureTable, ValueKind};

/// A single `-v host:container` volume mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub host: String,
    pub container: String,
}

impl Mount {
    /// Mount a host path at the same location inside the container.
    pub fn identity(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            host: path.clone(),
            container: path,
        }
    }
}

impl fmt::Display for Mount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spec = format!("{}:{}", self.host, self.container);
        write!(f, "-v {}", shell_quote(&spec))
    }
}

/// Rendered container invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerCommand {
    pub mounts: Vec<Mount>,
    pub line: String,
}

impl fmt::Display for ContainerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

/// Render the invocation as a `docker run` line.
pub fn render(
    interpretation: &Interpretation,
    table: &SignatureTable,
    invocation: &Invocation,
) -> ContainerCommand {
    let resolved = match interpretation {
        Interpretation::Help => {
            let line = CommandLine::new()
                .push("docker run -t")
                .push(invocation.image.as_str())
                .push(invocation.binary.as_str())
                .push(invocation.command.as_str())
                .push("-h")
                .build();
            return ContainerCommand {
                mounts: Vec::new(),
                line,
            };
        }
        Interpretation::Resolved(resolved) => resolved,
    };

    let mounts = compute_mounts(resolved, table);
    tracing::debug!(mounts = mounts.len(), "Computed container mounts");

    let flags = resolved
        .non_default_flags(table)
        .map(|flag| render_flag(flag, &resolved.flag_value(flag), resolved.cwd()))
        .collect();

    let line = CommandLine::new()
        .push("docker run")
        .with_flags(mounts.iter().map(Mount::to_string).collect())
        .push("-t")
        .push(invocation.image.as_str())
        .push(invocation.binary.as_str())
        .push(invocation.command.as_str())
        .with_flags(flags)
        .with_positionals(resolved.positionals(), resolved.cwd())
        .build();

    ContainerCommand { mounts, line }
}

/// Host paths the command may touch, deduplicated and sorted.
///
/// Directory flags contribute their value, file flags their parent directory,
/// and directory-typed positionals their value. Every flag is considered,
/// not only non-default ones.
pub fn compute_mounts(resolved: &ResolvedOptionSet, table: &SignatureTable) -> Vec<Mount> {
    let cwd = resolved.cwd();
    let mut host_paths = BTreeSet::new();

    for flag in table.flags() {
        let value = resolved.flag_value(flag);
        if value.is_empty() {
            continue;
        }
        match flag.kind() {
            ValueKind::Path(FsKind::Dir) => {
                host_paths.insert(absolutize(&value.to_string(), cwd));
            }
            ValueKind::Path(FsKind::File) => {
                host_paths.insert(parent_dir(&value.to_string(), cwd));
            }
            ValueKind::Boolean | ValueKind::Scalar => {}
        }
    }

    for arg in resolved.positionals() {
        if arg.kind.is_fs_dir() && !arg.is_blank() {
            host_paths.insert(absolutize(&arg.value, cwd));
        }
    }

    host_paths.into_iter().map(Mount::identity).collect()
}
