use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use cmdsignature::config::Config;
use cmdsignature::program::{Dispatch, ProgramSignature};
use cmdsignature::render::{batch, container, host};
use cmdsignature::resolve::Overrides;
use cmdsignature::signature::{OptionValue, SignatureTable};
use cmdsignature::{InterpretError, Interpretation, Interpreter, Invocation};

/// Render command signatures for host, docker and kubernetes targets.
#[derive(Parser, Debug)]
#[command(name = "cmdsignature", version, about)]
struct Cli {
    /// Config file (default: ~/.config/cmdsignature/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the command line for running directly on the host.
    Host(RenderArgs),
    /// Print a `docker run` command line with volume mounts.
    Docker(RenderArgs),
    /// Print a batch/v1 Job document.
    Kube {
        #[command(flatten)]
        render: RenderArgs,
        /// Output format of the Job document.
        #[arg(long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },
    /// Print the usage of a command signature.
    Usage {
        /// Signature file (YAML).
        #[arg(long)]
        signature: PathBuf,
        /// Program name shown in the usage line.
        #[arg(long)]
        binary: String,
        /// Command name shown in the usage line.
        #[arg(long)]
        command: String,
    },
    /// Dispatch argv against a program signature.
    Program {
        /// Program signature files, merged in order.
        #[arg(long = "program-file", required = true)]
        program_files: Vec<PathBuf>,
        /// Directory entry points are relative to.
        #[arg(long, default_value = "")]
        cmd_root: String,
        /// Program name shown in help.
        #[arg(long, default_value = "cmdsignature")]
        name: String,
        /// Program arguments (command first).
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        argv: Vec<String>,
    },
}

#[derive(clap::Args, Debug)]
struct RenderArgs {
    /// Signature file (YAML).
    #[arg(long)]
    signature: PathBuf,
    /// Binary to invoke.
    #[arg(long)]
    binary: String,
    /// Command passed to the binary.
    #[arg(long)]
    command: String,
    /// Task name used in job names.
    #[arg(long, default_value = "task")]
    task: String,
    /// Container image.
    #[arg(long, default_value = "")]
    image: String,
    /// Force a flag value: LONG=VALUE (repeatable).
    #[arg(long = "set", value_name = "LONG=VALUE")]
    overrides: Vec<String>,
    /// Arguments for the command.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Host(args) => {
            let (table, invocation, interpretation) = interpret(&args)?;
            println!("{}", host::render(&interpretation, &table, &invocation));
        }
        Commands::Docker(args) => {
            let (table, invocation, interpretation) = interpret(&args)?;
            println!("{}", container::render(&interpretation, &table, &invocation));
        }
        Commands::Kube { render, format } => {
            let config = match &cli.config {
                Some(path) => Config::load_from(path),
                None => Config::load(),
            }
            .context("failed to load configuration")?;

            let (table, invocation, interpretation) = interpret(&render)?;
            let job = batch::render(&interpretation, &table, &invocation, &config.batch)
                .inspect_err(|e| {
                    tracing::debug!(error_type = e.error_type(), "Batch render failed");
                })?;
            let out = match format {
                Format::Yaml => serde_yaml::to_string(&job)?,
                Format::Json => serde_json::to_string_pretty(&job)?,
            };
            println!("{}", out.trim_end());
        }
        Commands::Usage {
            signature,
            binary,
            command,
        } => {
            let table = load_signature(&signature)?;
            print!("{}", table.usage(&binary, &command));
        }
        Commands::Program {
            program_files,
            cmd_root,
            name,
            argv,
        } => {
            let program = ProgramSignature::new(name, cmd_root).load(&program_files)?;
            match program.dispatch(&argv)? {
                Dispatch::Help => print!("{}", program.help_text()),
                Dispatch::Invoke(line) => println!("{}", line),
            }
        }
    }
    Ok(())
}

fn load_signature(path: &Path) -> Result<SignatureTable> {
    SignatureTable::load(path)
        .with_context(|| format!("failed to load signature '{}'", path.display()))
}

fn interpret(args: &RenderArgs) -> Result<(SignatureTable, Invocation, Interpretation)> {
    let table = load_signature(&args.signature)?;
    let overrides = parse_overrides(&table, &args.overrides)?;
    let invocation = Invocation::new(
        args.binary.as_str(),
        args.command.as_str(),
        args.task.as_str(),
        args.image.as_str(),
    );

    let interpretation = match Interpreter::new(&table).interpret(&args.args, &overrides) {
        Ok(interpretation) => interpretation,
        Err(InterpretError::Validation(e)) => {
            eprint!("{}", table.usage(&args.binary, &args.command));
            return Err(anyhow!(e).context("invalid arguments"));
        }
        Err(e) => return Err(e.into()),
    };

    Ok((table, invocation, interpretation))
}

/// Turn `LONG=VALUE` pairs into typed overrides.
fn parse_overrides(table: &SignatureTable, raw: &[String]) -> Result<Overrides> {
    let mut overrides = Overrides::new();
    for pair in raw {
        let Some((long, value)) = pair.split_once('=') else {
            bail!("override '{}' is not of the form LONG=VALUE", pair);
        };
        let long = long.trim_start_matches("--");
        let Some(flag) = table.flag_by_long(long) else {
            bail!("override '{}' does not match any flag", long);
        };
        let value = OptionValue::parse_as(value, flag.declared).ok_or_else(|| {
            anyhow!(
                "override '{}' expects {}, got '{}'",
                long,
                flag.declared.label(),
                value
            )
        })?;
        overrides.insert(long, value);
    }
    Ok(overrides)
}
