//! Command signatures: the flag and positional-argument table of one command.

mod table;
mod types;
mod usage;

pub use table::{SignatureError, SignatureTable};
pub use types::{
    DeclaredType, DefaultAction, Direction, FlagDescriptor, FsKind, OptionValue, PositionalArg,
    PositionalDescriptor, ValueKind,
};
