//! Argument binder: raw argv → parsed option values.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::signature::{DeclaredType, FlagDescriptor, OptionValue, PositionalArg, SignatureTable};

/// Failures while binding argv against a signature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{flag}: unknown flag")]
    UnknownFlag { flag: String },

    #[error("--{flag}: missing required value")]
    MissingValue { flag: String },

    #[error("--{flag}: expected {expected}, got '{value}'")]
    TypeMismatch {
        flag: String,
        expected: &'static str,
        value: String,
    },

    #[error("--{flag}: required flag not supplied")]
    RequiredFlag { flag: String },

    #[error("unexpected positional argument '{value}'")]
    TooManyPositionals { value: String },
}

/// Option values keyed by target variable, defaults already applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArgs {
    pub values: BTreeMap<String, OptionValue>,
    pub positionals: Vec<PositionalArg>,
}

impl ParsedArgs {
    /// Start from every flag's declared default and blank positionals.
    pub fn defaults(table: &SignatureTable) -> Self {
        let values = table
            .flags()
            .iter()
            .map(|f| (f.target(), f.default_value()))
            .collect();
        Self {
            values,
            positionals: table.bind_positionals(&[]),
        }
    }

    pub fn get(&self, target: &str) -> Option<&OptionValue> {
        self.values.get(target)
    }

    /// Set a flag's value by target variable.
    pub fn set(&mut self, target: impl Into<String>, value: impl Into<OptionValue>) -> &mut Self {
        self.values.insert(target.into(), value.into());
        self
    }
}

/// Returns true when argv asks for help.
pub fn is_help_request(args: &[String]) -> bool {
    args.iter().any(|a| a == "-h" || a == "--help")
}

/// Bind raw argv against the table.
pub fn bind(table: &SignatureTable, raw_args: &[String]) -> Result<ParsedArgs, ValidationError> {
    let mut parsed = ParsedArgs::defaults(table);
    let mut supplied: Vec<&str> = Vec::new();
    let mut positional_values: Vec<String> = Vec::new();
    let mut iter = raw_args.iter().peekable();
    let mut flags_done = false;

    while let Some(arg) = iter.next() {
        if flags_done || !arg.starts_with('-') || arg == "-" {
            positional_values.push(arg.clone());
            continue;
        }

        if arg == "--" {
            flags_done = true;
            continue;
        }

        // --long=value
        let (token, inline) = match arg.split_once('=') {
            Some((t, v)) if t.starts_with("--") => (t, Some(v.to_string())),
            _ => (arg.as_str(), None),
        };

        let def = table
            .flags()
            .iter()
            .find(|d| d.matches(token))
            .ok_or_else(|| ValidationError::UnknownFlag {
                flag: token.to_string(),
            })?;

        let value = match def.declared {
            DeclaredType::Boolean => match inline {
                Some(raw) => convert(def, &raw)?,
                None => OptionValue::Bool(true),
            },
            _ => {
                let raw = match inline {
                    Some(raw) => raw,
                    None => match iter.next() {
                        Some(next) => next.clone(),
                        None => {
                            return Err(ValidationError::MissingValue {
                                flag: def.long.clone(),
                            })
                        }
                    },
                };
                convert(def, &raw)?
            }
        };

        parsed.values.insert(def.target(), value);
        supplied.push(&def.name);
    }

    let declared = table.positional_descriptors().len();
    if positional_values.len() > declared {
        return Err(ValidationError::TooManyPositionals {
            value: positional_values[declared].clone(),
        });
    }

    if let Some(missing) = table
        .flags()
        .iter()
        .find(|f| f.required && !supplied.contains(&f.name.as_str()))
    {
        return Err(ValidationError::RequiredFlag {
            flag: missing.long.clone(),
        });
    }

    parsed.positionals = table.bind_positionals(&positional_values);
    Ok(parsed)
}

fn convert(def: &FlagDescriptor, raw: &str) -> Result<OptionValue, ValidationError> {
    OptionValue::parse_as(raw, def.declared).ok_or_else(|| ValidationError::TypeMismatch {
        flag: def.long.clone(),
        expected: def.declared.label(),
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SignatureTable {
        SignatureTable::from_yaml_str(
            r#"
flags:
  - {name: verbose, long: verbose, short: v, type: boolean}
  - {name: jobs, long: jobs, short: j, type: integer, default: 1}
  - {name: out, long: output, type: directory}
args:
  - {name: first}
  - {name: second}
"#,
        )
        .unwrap()
    }

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_are_applied() {
        let parsed = bind(&table(), &[]).unwrap();
        assert_eq!(parsed.get("verbose"), Some(&OptionValue::Bool(false)));
        assert_eq!(parsed.get("jobs"), Some(&OptionValue::Int(1)));
        assert_eq!(parsed.get("output"), Some(&OptionValue::Text(String::new())));
        assert_eq!(parsed.positionals.len(), 2);
    }

    #[test]
    fn short_long_and_inline_forms() {
        let parsed = bind(&table(), &argv(&["-v", "--jobs=4", "--output", "/tmp/x", "a"])).unwrap();
        assert_eq!(parsed.get("verbose"), Some(&OptionValue::Bool(true)));
        assert_eq!(parsed.get("jobs"), Some(&OptionValue::Int(4)));
        assert_eq!(parsed.get("output"), Some(&OptionValue::Text("/tmp/x".into())));
        assert_eq!(parsed.positionals[0].value, "a");
        assert!(parsed.positionals[1].is_blank());
    }

    #[test]
    fn double_dash_ends_flags() {
        let parsed = bind(&table(), &argv(&["--", "-v"])).unwrap();
        assert_eq!(parsed.positionals[0].value, "-v");
        assert_eq!(parsed.get("verbose"), Some(&OptionValue::Bool(false)));
    }

    #[test]
    fn integer_type_mismatch() {
        let err = bind(&table(), &argv(&["--jobs", "many"])).unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { ref flag, .. } if flag == "jobs"));
    }

    #[test]
    fn unknown_flag_and_missing_value() {
        assert!(matches!(
            bind(&table(), &argv(&["--typo"])),
            Err(ValidationError::UnknownFlag { .. })
        ));
        assert!(matches!(
            bind(&table(), &argv(&["--output"])),
            Err(ValidationError::MissingValue { .. })
        ));
    }

    #[test]
    fn too_many_positionals() {
        let err = bind(&table(), &argv(&["a", "b", "c"])).unwrap_err();
        assert_eq!(err, ValidationError::TooManyPositionals { value: "c".into() });
    }

    #[test]
    fn required_flag_enforced() {
        let table = SignatureTable::from_yaml_str(
            "flags:\n  - {name: image, long: image, required: true}\n",
        )
        .unwrap();
        assert!(matches!(
            bind(&table, &[]),
            Err(ValidationError::RequiredFlag { flag }) if flag == "image"
        ));
    }

    #[test]
    fn help_detection() {
        assert!(is_help_request(&argv(&["--output", "x", "-h"])));
        assert!(is_help_request(&argv(&["--help"])));
        assert!(!is_help_request(&argv(&["--helpful"])));
    }
}
