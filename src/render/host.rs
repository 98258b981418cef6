//! Host renderer: `<binary> <command> <flags> <positional>`.

use crate::interpreter::{Interpretation, Invocation};
use crate::render::assembler::{render_flag, CommandLine};
use crate::signature::SignatureTable;

/// Render the invocation as a host command line.
pub fn render(
    interpretation: &Interpretation,
    table: &SignatureTable,
    invocation: &Invocation,
) -> String {
    let resolved = match interpretation {
        Interpretation::Help => {
            return CommandLine::new()
                .push(invocation.binary.as_str())
                .push(invocation.command.as_str())
                .push("-h")
                .build();
        }
        Interpretation::Resolved(resolved) => resolved,
    };

    let flags = resolved
        .non_default_flags(table)
        .map(|flag| render_flag(flag, &resolved.flag_value(flag), resolved.cwd()))
        .collect();

    CommandLine::new()
        .push(invocation.binary.as_str())
        .push(invocation.command.as_str())
        .with_flags(flags)
        .with_positionals(resolved.positionals(), resolved.cwd())
        .build()
}
