//! Render backends.
//!
//! Host, container and batch renderers share one input contract: an
//! [`Interpretation`](crate::interpreter::Interpretation), the signature
//! table and the [`Invocation`](crate::interpreter::Invocation). Each call
//! recomputes its artifact; nothing is cached.

mod assembler;
pub mod batch;
pub mod container;
pub mod host;
mod quote;

pub use assembler::{render_flag, CommandLine};
pub use container::{ContainerCommand, Mount};
pub use quote::shell_quote;
