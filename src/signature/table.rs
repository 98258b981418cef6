//! Signature table: read-only view over a command's flags and arguments.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::signature::types::{
    DeclaredType, FlagDescriptor, OptionValue, PositionalArg, PositionalDescriptor,
};

/// Errors that can occur when loading a signature file.
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("Failed to read signature file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse signature: {source}")]
    ParseError {
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Duplicate flag '{name}' in signature")]
    DuplicateFlag { name: String },

    #[error("Flag '{name}' has an empty long name")]
    EmptyLongName { name: String },

    #[error("Default of flag '{name}' does not match its type '{declared}'")]
    DefaultTypeMismatch { name: String, declared: &'static str },
}

#[derive(Debug, Deserialize)]
struct SignatureFile {
    #[serde(default)]
    flags: Vec<FlagDescriptor>,
    #[serde(default)]
    args: Vec<PositionalDescriptor>,
}

/// A command's flags (declaration order) and positional arguments.
#[derive(Debug, Clone, Default)]
pub struct SignatureTable {
    flags: Vec<FlagDescriptor>,
    args: Vec<PositionalDescriptor>,
}

impl SignatureTable {
    /// Build a table from already-constructed descriptors.
    pub fn new(
        flags: Vec<FlagDescriptor>,
        args: Vec<PositionalDescriptor>,
    ) -> Result<Self, SignatureError> {
        let mut names = HashSet::new();
        let mut longs = HashSet::new();
        let mut normalized = Vec::with_capacity(flags.len());

        for mut flag in flags {
            if flag.long.is_empty() {
                return Err(SignatureError::EmptyLongName { name: flag.name });
            }
            if !names.insert(flag.name.clone()) {
                return Err(SignatureError::DuplicateFlag { name: flag.name });
            }
            if !longs.insert(flag.long.clone()) {
                return Err(SignatureError::DuplicateFlag { name: flag.long });
            }
            flag.default = normalize_default(&flag)?;
            normalized.push(flag);
        }

        Ok(Self {
            flags: normalized,
            args,
        })
    }

    /// Parse a YAML signature document.
    pub fn from_yaml_str(content: &str) -> Result<Self, SignatureError> {
        let file: SignatureFile =
            serde_yaml::from_str(content).map_err(|source| SignatureError::ParseError { source })?;
        Self::new(file.flags, file.args)
    }

    /// Load a YAML signature from disk.
    pub fn load(path: &Path) -> Result<Self, SignatureError> {
        let content = fs::read_to_string(path).map_err(|e| SignatureError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn flags(&self) -> &[FlagDescriptor] {
        &self.flags
    }

    pub fn flag(&self, name: &str) -> Option<&FlagDescriptor> {
        self.flags.iter().find(|f| f.name == name)
    }

    pub fn flag_by_long(&self, long: &str) -> Option<&FlagDescriptor> {
        self.flags.iter().find(|f| f.long == long)
    }

    /// Flags classified as filesystem directories.
    pub fn fs_dirs(&self) -> impl Iterator<Item = &FlagDescriptor> {
        self.flags.iter().filter(|f| f.kind().is_fs_dir())
    }

    pub fn positional_descriptors(&self) -> &[PositionalDescriptor] {
        &self.args
    }

    /// Bind values to the declared positional arguments, in order.
    ///
    /// Missing values are left blank.
    pub fn bind_positionals(&self, values: &[String]) -> Vec<PositionalArg> {
        self.args
            .iter()
            .enumerate()
            .map(|(i, desc)| PositionalArg {
                name: desc.name.clone(),
                value: values.get(i).cloned().unwrap_or_default(),
                kind: desc.declared.kind(),
                default_action: desc.default_action,
            })
            .collect()
    }
}

/// Coerce a YAML default into the flag's declared type.
///
/// YAML reads `default: 8` as an integer; a string flag stores it as text so
/// that a parsed "8" compares equal.
fn normalize_default(flag: &FlagDescriptor) -> Result<Option<OptionValue>, SignatureError> {
    let Some(value) = &flag.default else {
        return Ok(None);
    };

    let mismatch = || SignatureError::DefaultTypeMismatch {
        name: flag.name.clone(),
        declared: flag.declared.label(),
    };

    let coerced = match (flag.declared, value) {
        (DeclaredType::Boolean, OptionValue::Bool(_)) => value.clone(),
        (DeclaredType::Boolean, _) => return Err(mismatch()),
        (DeclaredType::Integer, OptionValue::Int(_)) => value.clone(),
        (DeclaredType::Integer, OptionValue::Text(s)) => {
            OptionValue::parse_as(s, DeclaredType::Integer).ok_or_else(mismatch)?
        }
        (DeclaredType::Integer, OptionValue::Bool(_)) => return Err(mismatch()),
        (_, other) => OptionValue::Text(other.to_string()),
    };
    Ok(Some(coerced))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNATURE: &str = r#"
flags:
  - name: output
    long: output
    short: o
    type: directory
    direction: out
    default-action: set-cwd
  - name: jobs
    long: jobs
    type: string
    default: 8
  - name: dry
    long: dry-run
    type: boolean
args:
  - name: source
    type: directory
"#;

    #[test]
    fn loads_flags_in_declaration_order() {
        let table = SignatureTable::from_yaml_str(SIGNATURE).unwrap();
        let names: Vec<_> = table.flags().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["output", "jobs", "dry"]);
        assert_eq!(table.fs_dirs().count(), 1);
    }

    #[test]
    fn string_default_is_coerced_to_text() {
        let table = SignatureTable::from_yaml_str(SIGNATURE).unwrap();
        let jobs = table.flag("jobs").unwrap();
        assert_eq!(jobs.default_value(), OptionValue::Text("8".into()));
    }

    #[test]
    fn duplicate_flag_rejected() {
        let yaml = "flags:\n  - {name: a, long: x}\n  - {name: a, long: y}\n";
        assert!(matches!(
            SignatureTable::from_yaml_str(yaml),
            Err(SignatureError::DuplicateFlag { name }) if name == "a"
        ));
    }

    #[test]
    fn boolean_default_must_be_bool() {
        let yaml = "flags:\n  - {name: a, long: a, type: boolean, default: maybe}\n";
        assert!(matches!(
            SignatureTable::from_yaml_str(yaml),
            Err(SignatureError::DefaultTypeMismatch { .. })
        ));
    }

    #[test]
    fn bind_positionals_pads_with_blanks() {
        let table = SignatureTable::from_yaml_str(SIGNATURE).unwrap();
        let bound = table.bind_positionals(&[]);
        assert_eq!(bound.len(), 1);
        assert!(bound[0].is_blank());
        assert!(bound[0].kind.is_fs_dir());
    }
}
