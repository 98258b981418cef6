//! Program signatures: a multi-command program and its dispatch.
//!
//! A program file lists commands, each with an entry point script and an
//! image. Dispatch picks the command named by `argv[0]` and builds the line
//! that runs its entry point with the remaining arguments.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::render::shell_quote;

/// Errors raised while loading or dispatching a program signature.
#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("Failed to read program signature '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse program signature '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Missing '{field}' field in program signature '{path}'")]
    MissingField { field: &'static str, path: PathBuf },

    #[error("Missing '{field}' field of a command in 'commands' field of '{path}'")]
    MissingCommandField { field: &'static str, path: PathBuf },

    #[error("'image' key missing for command '{command}' in '{path}'")]
    MissingImage { command: String, path: PathBuf },

    #[error("Command '{0}' not recognized")]
    UnknownCommand(String),
}

#[derive(Debug, Deserialize)]
struct RawProgram {
    description: Option<String>,
    image: Option<String>,
    commands: Option<Vec<RawCommand>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawCommand {
    name: Option<String>,
    entry_point: Option<String>,
    description: Option<String>,
    image: Option<String>,
    #[serde(default)]
    flags: Vec<String>,
}

/// One command of a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: String,
    pub entry_point: String,
    pub description: String,
    pub image: String,
    /// Signature files describing the command's flags.
    pub flags: Vec<String>,
}

/// What `argv` asks the program to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Print the program help.
    Help,
    /// Shell line running the command's entry point.
    Invoke(String),
}

/// All commands of a program, merged from one or more files.
#[derive(Debug, Clone, Default)]
pub struct ProgramSignature {
    program: String,
    cmd_root: String,
    description: String,
    commands: BTreeMap<String, CommandSpec>,
}

impl ProgramSignature {
    pub fn new(program: impl Into<String>, cmd_root: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            cmd_root: cmd_root.into(),
            ..Self::default()
        }
    }

    /// Load and merge program files. Later files override same-named commands.
    pub fn load(mut self, paths: &[PathBuf]) -> Result<Self, ProgramError> {
        for path in paths {
            let content = fs::read_to_string(path).map_err(|e| ProgramError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })?;
            self.merge_yaml(&content, path)?;
        }
        Ok(self)
    }

    /// Merge one YAML program document. `origin` is used in error messages.
    pub fn merge_yaml(&mut self, content: &str, origin: &Path) -> Result<(), ProgramError> {
        let raw: RawProgram =
            serde_yaml::from_str(content).map_err(|e| ProgramError::ParseError {
                path: origin.to_path_buf(),
                source: e,
            })?;

        let missing = |field| ProgramError::MissingField {
            field,
            path: origin.to_path_buf(),
        };
        let commands = raw.commands.ok_or_else(|| missing("commands"))?;
        let description = raw.description.ok_or_else(|| missing("description"))?;

        if self.description.is_empty() {
            self.description = description;
        }

        for cmd in commands {
            let field = |field| ProgramError::MissingCommandField {
                field,
                path: origin.to_path_buf(),
            };
            let name = cmd.name.ok_or_else(|| field("name"))?;
            let entry_point = cmd.entry_point.ok_or_else(|| field("entry-point"))?;
            let description = cmd.description.ok_or_else(|| field("description"))?;
            let image = match cmd.image.or_else(|| raw.image.clone()) {
                Some(image) => image,
                None => {
                    return Err(ProgramError::MissingImage {
                        command: name,
                        path: origin.to_path_buf(),
                    })
                }
            };

            tracing::debug!(command = %name, "Registered program command");
            self.commands.insert(
                name.clone(),
                CommandSpec {
                    name,
                    entry_point,
                    description,
                    image,
                    flags: cmd.flags,
                },
            );
        }

        Ok(())
    }

    pub fn command(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(name)
    }

    /// Signature files of a command; empty when the command is unknown.
    pub fn command_flags(&self, name: &str) -> &[String] {
        self.commands
            .get(name)
            .map(|c| c.flags.as_slice())
            .unwrap_or_default()
    }

    pub fn command_image(&self, name: &str) -> Option<&str> {
        self.commands.get(name).map(|c| c.image.as_str())
    }

    /// Program help: synopsis, description and a sorted command list.
    pub fn help_text(&self) -> String {
        let width = self
            .commands
            .keys()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max(4);

        let mut out = format!("Synopsis: {} COMMAND [OPTIONS]\n\n", self.program);
        if !self.description.is_empty() {
            out.push_str(&format!(" {}\n\n", self.description));
        }
        out.push_str(&format!("\t{:width$}   Prints this help\n", "help", width = width));
        for cmd in self.commands.values() {
            out.push_str(&format!(
                "\t{:width$}   {}\n",
                cmd.name,
                cmd.description,
                width = width
            ));
        }
        out
    }

    /// Decide what `argv` asks for.
    pub fn dispatch(&self, argv: &[String]) -> Result<Dispatch, ProgramError> {
        let Some((command, args)) = argv.split_first() else {
            return Ok(Dispatch::Help);
        };
        if matches!(command.as_str(), "-h" | "--help" | "help") {
            return Ok(Dispatch::Help);
        }

        let spec = self
            .commands
            .get(command)
            .ok_or_else(|| ProgramError::UnknownCommand(command.clone()))?;

        let entry_point = if self.cmd_root.is_empty() {
            spec.entry_point.clone()
        } else {
            format!("{}/{}", self.cmd_root, spec.entry_point)
        };

        let mut parts = Vec::with_capacity(args.len() + 2);
        if let Some(interpreter) = interpreter_for(Path::new(&entry_point)) {
            parts.push(interpreter.to_string());
        }
        parts.push(entry_point);
        parts.extend(args.iter().map(|a| shell_quote(a)));

        Ok(Dispatch::Invoke(parts.join(" ")))
    }
}

/// Interpreter for an entry point, judged by extension.
///
/// For symlinks the link target's file name decides.
fn interpreter_for(entry_point: &Path) -> Option<&'static str> {
    let resolved = match fs::symlink_metadata(entry_point) {
        Ok(meta) if meta.file_type().is_symlink() => fs::read_link(entry_point).ok(),
        _ => None,
    };
    let file = resolved.as_deref().unwrap_or(entry_point);

    match file.extension().and_then(|e| e.to_str()) {
        Some("py") => Some("python"),
        Some("sh") => Some("bash"),
        _ => None,
    }
}
