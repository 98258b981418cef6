//! Batch-job renderer: a one-shot `batch/v1` `Job` running the command.
//!
//! There is no shared host filesystem in this target, so directory flags
//! cannot be passed through. Output directories are redirected to scratch
//! paths inside the container and uploaded to the artifact store when the
//! command finishes; input directories are rejected.

mod job;
mod steps;

pub use job::{
    Container, Job, JobSpec, ObjectMeta, PodSpec, PodTemplate, SecretSource, Volume, VolumeMount,
};
pub use steps::{JobScript, RemoteStore, Step, LOG_FILE, SECRET_MOUNT_PATH, STAGED_KEY_PATH};

use crate::config::BatchConfig;
use crate::error::{ConfigurationError, RenderError};
use crate::interpreter::{Interpretation, Invocation};
use crate::render::assembler::{render_flag, CommandLine};
use crate::render::quote::shell_quote;
use crate::signature::{Direction, FsKind, SignatureTable, ValueKind};

/// Name of the secret holding the storage key, and of its volume.
pub const STORAGE_SECRET: &str = "storage-pk";

/// Render the invocation as a Job document.
///
/// Fails without producing anything on help requests and on directory
/// flags whose direction is missing or `in`.
pub fn render(
    interpretation: &Interpretation,
    table: &SignatureTable,
    invocation: &Invocation,
    config: &BatchConfig,
) -> Result<Job, RenderError> {
    let resolved = match interpretation {
        Interpretation::Help => {
            return Err(RenderError::Unsupported {
                backend: "kubernetes signature",
                operation: "help",
            })
        }
        Interpretation::Resolved(resolved) => resolved,
    };

    let mut flags = Vec::new();
    // (archive name, scratch path) per out-flag
    let mut out_dirs = Vec::new();

    for flag in resolved.non_default_flags(table) {
        match flag.kind() {
            ValueKind::Boolean | ValueKind::Scalar | ValueKind::Path(FsKind::File) => {
                flags.push(render_flag(flag, &resolved.flag_value(flag), resolved.cwd()));
            }
            ValueKind::Path(FsKind::Dir) => match flag.direction {
                None => {
                    return Err(ConfigurationError::MissingDirection {
                        flag: flag.name.clone(),
                    }
                    .into())
                }
                Some(Direction::In) => {
                    return Err(ConfigurationError::UnsupportedInputDirection {
                        flag: flag.name.clone(),
                    }
                    .into())
                }
                Some(Direction::Out) => {
                    let scratch = format!("{}/{}", config.scratch_root, flag.name);
                    flags.push(format!("--{} {}", flag.long, shell_quote(&scratch)));
                    out_dirs.push((flag.target(), scratch));
                }
            },
        }
    }

    let job_name = format!(
        "job-{}-{}-{}",
        invocation.task,
        invocation.command,
        uuid::Uuid::new_v4().simple()
    );
    tracing::debug!(job = %job_name, out_flags = out_dirs.len(), "Generating batch job");

    let command_line = CommandLine::new()
        .push(invocation.binary.as_str())
        .push(invocation.command.as_str())
        .with_flags(flags)
        .with_positionals(resolved.positionals(), resolved.cwd())
        .build();

    let store = RemoteStore {
        hostname: config.hostname.clone(),
        servername: config.servername.clone(),
        target: config.target.clone(),
        job_name: job_name.clone(),
    };
    let script = JobScript::new(command_line, &out_dirs, &store);

    Ok(job_document(job_name, invocation, script.render()))
}

fn job_document(name: String, invocation: &Invocation, script: String) -> Job {
    Job {
        api_version: "batch/v1".to_string(),
        kind: "Job".to_string(),
        metadata: ObjectMeta { name: name.clone() },
        spec: JobSpec {
            template: PodTemplate {
                metadata: ObjectMeta { name: name.clone() },
                spec: PodSpec {
                    containers: vec![Container {
                        name,
                        image: invocation.image.clone(),
                        command: vec!["/bin/sh".to_string(), "-ec".to_string(), script],
                        volume_mounts: vec![VolumeMount {
                            name: STORAGE_SECRET.to_string(),
                            mount_path: SECRET_MOUNT_PATH.to_string(),
                            read_only: true,
                        }],
                    }],
                    restart_policy: "Never".to_string(),
                    volumes: vec![Volume {
                        name: STORAGE_SECRET.to_string(),
                        secret: SecretSource {
                            secret_name: STORAGE_SECRET.to_string(),
                        },
                    }],
                },
            },
        },
    }
}
