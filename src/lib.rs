//! Command signature resolution and rendering.
//!
//! A [`SignatureTable`](signature::SignatureTable) describes a command's
//! flags and positional arguments. Argv is bound against it, merged with
//! computed defaults and caller overrides into a
//! [`ResolvedOptionSet`](resolve::ResolvedOptionSet), and rendered for one
//! target:
//!
//! ```text
//! argv → args::bind → resolve → render::{host, container, batch}
//! ```

pub mod args;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod program;
pub mod render;
pub mod resolve;
pub mod signature;

pub use error::{ConfigurationError, RenderError};
pub use interpreter::{InterpretError, Interpretation, Interpreter, Invocation};
