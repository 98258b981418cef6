//! Option resolution.
//!
//! ```text
//! ParsedArgs → non-default scan → default paths → overrides → ResolvedOptionSet
//! ```
//!
//! Every stage is a pure function of its inputs; the working directory is
//! passed in rather than read here.

mod defaults;
mod options;
mod overrides;
mod paths;

pub use defaults::{check_contiguous, resolve_default_paths, DefaultPaths};
pub use options::{NonDefaultSet, ResolvedOptionSet};
pub use overrides::Overrides;
pub use paths::{absolutize, parent_dir};
