//! Resolved option set: the single input every renderer consumes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::args::ParsedArgs;
use crate::error::ConfigurationError;
use crate::resolve::defaults::resolve_default_paths;
use crate::resolve::overrides::{self, Overrides};
use crate::signature::{FlagDescriptor, OptionValue, PositionalArg, SignatureTable};

/// Insertion-ordered set of flag names that must be rendered explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NonDefaultSet {
    names: Vec<String>,
}

impl NonDefaultSet {
    /// Insert if absent. Returns true when the name was new.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Merged outcome of defaults, parsed values, computed defaults and overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptionSet {
    values: BTreeMap<String, OptionValue>,
    non_default: NonDefaultSet,
    positionals: Vec<PositionalArg>,
    cwd: PathBuf,
}

impl ResolvedOptionSet {
    /// Build the option set.
    ///
    /// 1. Flags whose parsed value differs from the declared default.
    /// 2. Directory flags left unset get their `default-action` value.
    /// 3. Overrides win over everything.
    pub fn build(
        table: &SignatureTable,
        parsed: &ParsedArgs,
        overrides: &Overrides,
        cwd: &Path,
    ) -> Result<Self, ConfigurationError> {
        let mut values = parsed.values.clone();
        let mut non_default = NonDefaultSet::default();

        for flag in table.flags() {
            let current = values
                .get(&flag.target())
                .cloned()
                .unwrap_or_else(|| flag.default_value());
            if current != flag.default_value() {
                non_default.insert(&flag.name);
            }
        }

        let empty_path_flags: Vec<String> = table
            .fs_dirs()
            .filter(|f| !non_default.contains(&f.name))
            .map(|f| f.name.clone())
            .collect();

        let defaults =
            resolve_default_paths(table, &empty_path_flags, parsed.positionals.clone(), cwd)?;
        for (target, value) in defaults.values {
            values.insert(target, OptionValue::Text(value));
        }
        for name in &defaults.defaulted {
            non_default.insert(name);
        }

        overrides::apply(table, overrides, &mut values, &mut non_default, cwd);

        tracing::debug!(
            non_default = non_default.len(),
            positionals = defaults.positionals.len(),
            "Resolved option set"
        );

        Ok(Self {
            values,
            non_default,
            positionals: defaults.positionals,
            cwd: cwd.to_path_buf(),
        })
    }

    /// Value of a target variable.
    pub fn value(&self, target: &str) -> Option<&OptionValue> {
        self.values.get(target)
    }

    /// Value of a flag, looked up through its target variable.
    pub fn flag_value(&self, flag: &FlagDescriptor) -> OptionValue {
        self.values
            .get(&flag.target())
            .cloned()
            .unwrap_or_else(|| flag.default_value())
    }

    pub fn non_default(&self) -> &NonDefaultSet {
        &self.non_default
    }

    pub fn is_non_default(&self, name: &str) -> bool {
        self.non_default.contains(name)
    }

    /// Non-default flags in set order, resolved against the table.
    pub fn non_default_flags<'t>(
        &'t self,
        table: &'t SignatureTable,
    ) -> impl Iterator<Item = &'t FlagDescriptor> + 't {
        self.non_default.iter().filter_map(move |name| table.flag(name))
    }

    pub fn positionals(&self) -> &[PositionalArg] {
        &self.positionals
    }

    /// Working directory captured at build time; relative paths resolve against it.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }
}
