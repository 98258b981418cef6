use std::fmt;

use serde::{Deserialize, Serialize};

/// Filesystem classification of a path-valued flag or argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsKind {
    File,
    Dir,
}

/// Closed set of value kinds a flag or positional argument can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Presence flag, rendered bare (`--verbose`).
    Boolean,
    /// Any non-path value, rendered as `--long value`.
    Scalar,
    /// Host path; normalized to an absolute path before rendering.
    Path(FsKind),
}

impl ValueKind {
    pub fn is_fs_dir(self) -> bool {
        matches!(self, ValueKind::Path(FsKind::Dir))
    }

    pub fn is_fs_file(self) -> bool {
        matches!(self, ValueKind::Path(FsKind::File))
    }

    pub fn is_fs_resource(self) -> bool {
        matches!(self, ValueKind::Path(_))
    }
}

/// `type:` field as written in a signature file.
///
/// `string` and `integer` collapse into [`ValueKind::Scalar`]; `integer` is
/// kept apart only so the binder can type-check values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclaredType {
    Boolean,
    #[default]
    String,
    Integer,
    File,
    Directory,
}

impl DeclaredType {
    pub fn kind(self) -> ValueKind {
        match self {
            DeclaredType::Boolean => ValueKind::Boolean,
            DeclaredType::String | DeclaredType::Integer => ValueKind::Scalar,
            DeclaredType::File => ValueKind::Path(FsKind::File),
            DeclaredType::Directory => ValueKind::Path(FsKind::Dir),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DeclaredType::Boolean => "boolean",
            DeclaredType::String => "string",
            DeclaredType::Integer => "integer",
            DeclaredType::File => "file",
            DeclaredType::Directory => "directory",
        }
    }
}

/// Whether a directory flag is consumed or produced by the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

/// Runtime default computed when a flag or argument has no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefaultAction {
    /// Substitute the process's current working directory.
    SetCwd,
    /// Any action this version does not know; ignored at resolution time.
    #[serde(other)]
    Unsupported,
}

/// A concrete flag value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl OptionValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, OptionValue::Text(s) if s.is_empty())
    }

    /// Parse a raw string (from argv or `--set`) according to a declared type.
    ///
    /// Returns `None` when the string does not fit the type.
    pub fn parse_as(raw: &str, declared: DeclaredType) -> Option<Self> {
        match declared {
            DeclaredType::Boolean => match raw {
                "true" | "1" | "yes" => Some(OptionValue::Bool(true)),
                "false" | "0" | "no" => Some(OptionValue::Bool(false)),
                _ => None,
            },
            DeclaredType::Integer => raw.parse().ok().map(OptionValue::Int),
            DeclaredType::String | DeclaredType::File | DeclaredType::Directory => {
                Some(OptionValue::Text(raw.to_string()))
            }
        }
    }
}

impl Default for OptionValue {
    fn default() -> Self {
        OptionValue::Text(String::new())
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Int(i) => write!(f, "{}", i),
            OptionValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Text(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Text(s)
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

/// A single flag definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FlagDescriptor {
    /// Key of the flag within the table (e.g., "output").
    pub name: String,
    /// Optional short form without the dash (e.g., "o").
    #[serde(default)]
    pub short: Option<String>,
    /// Long form without the dashes (e.g., "output-dir").
    pub long: String,
    /// Target variable the parsed value is stored under.
    #[serde(default)]
    pub target: Option<String>,
    #[serde(rename = "type", default)]
    pub declared: DeclaredType,
    #[serde(default)]
    pub default: Option<OptionValue>,
    #[serde(default)]
    pub direction: Option<Direction>,
    #[serde(default)]
    pub default_action: Option<DefaultAction>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl FlagDescriptor {
    /// Create a scalar flag whose target is derived from `long`.
    pub fn new(name: impl Into<String>, long: impl Into<String>, declared: DeclaredType) -> Self {
        Self {
            name: name.into(),
            short: None,
            long: long.into(),
            target: None,
            declared,
            default: None,
            direction: None,
            default_action: None,
            required: false,
            description: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<OptionValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_default_action(mut self, action: DefaultAction) -> Self {
        self.default_action = Some(action);
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_short(mut self, short: impl Into<String>) -> Self {
        self.short = Some(short.into());
        self
    }

    pub fn kind(&self) -> ValueKind {
        self.declared.kind()
    }

    /// Target variable, falling back to `long` with dashes as underscores.
    pub fn target(&self) -> String {
        match &self.target {
            Some(t) => t.clone(),
            None => self.long.replace('-', "_"),
        }
    }

    /// Declared default, or the zero value for the flag's kind.
    pub fn default_value(&self) -> OptionValue {
        match (&self.default, self.declared) {
            (Some(v), _) => v.clone(),
            (None, DeclaredType::Boolean) => OptionValue::Bool(false),
            (None, _) => OptionValue::default(),
        }
    }

    /// Check if this definition matches the given argv token.
    pub fn matches(&self, arg: &str) -> bool {
        if let Some(long) = arg.strip_prefix("--") {
            return long == self.long;
        }
        match (arg.strip_prefix('-'), &self.short) {
            (Some(s), Some(short)) => s == short,
            _ => false,
        }
    }
}

/// A positional argument as declared in a signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PositionalDescriptor {
    pub name: String,
    #[serde(rename = "type", default)]
    pub declared: DeclaredType,
    #[serde(default)]
    pub default_action: Option<DefaultAction>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A positional argument bound to its value. Empty value means unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionalArg {
    pub name: String,
    pub value: String,
    pub kind: ValueKind,
    pub default_action: Option<DefaultAction>,
}

impl PositionalArg {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind: ValueKind::Scalar,
            default_action: None,
        }
    }

    pub fn with_default_action(mut self, action: DefaultAction) -> Self {
        self.default_action = Some(action);
        self
    }

    pub fn is_blank(&self) -> bool {
        self.value.is_empty()
    }
}
