//! Argument binding.
//!
//! ```text
//! argv → help check → bind against SignatureTable → ParsedArgs
//! ```

mod binder;

pub use binder::{bind, is_help_request, ParsedArgs, ValidationError};
