//! Caller-forced flag values.

use std::collections::BTreeMap;
use std::path::Path;

use crate::resolve::options::NonDefaultSet;
use crate::resolve::paths::absolutize;
use crate::signature::{OptionValue, SignatureTable};

/// Long flag name → forced value. Built per call, never shared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    entries: BTreeMap<String, OptionValue>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force `long` to `value`.
    pub fn with(mut self, long: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.entries.insert(long.into(), value.into());
        self
    }

    pub fn insert(&mut self, long: impl Into<String>, value: impl Into<OptionValue>) {
        self.entries.insert(long.into(), value.into());
    }

    pub fn get(&self, long: &str) -> Option<&OptionValue> {
        self.entries.get(long)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &OptionValue)> {
        self.entries.iter()
    }
}

/// Apply overrides on top of resolved values.
///
/// Runs last so overrides beat both declared and computed defaults. Each
/// overridden flag joins the non-default set. Filesystem values are made
/// absolute against `cwd`.
pub fn apply(
    table: &SignatureTable,
    overrides: &Overrides,
    values: &mut BTreeMap<String, OptionValue>,
    non_default: &mut NonDefaultSet,
    cwd: &Path,
) {
    for flag in table.flags() {
        let Some(forced) = overrides.get(&flag.long) else {
            continue;
        };

        let value = if flag.kind().is_fs_resource() {
            OptionValue::Text(absolutize(&forced.to_string(), cwd))
        } else {
            forced.clone()
        };

        tracing::debug!(flag = %flag.name, value = %value, "Applied override");
        values.insert(flag.target(), value);
        non_default.insert(&flag.name);
    }

    for (long, _) in overrides.iter() {
        if table.flag_by_long(long).is_none() {
            tracing::warn!(flag = %long, "Override does not match any flag, ignoring");
        }
    }
}
