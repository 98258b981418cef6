//! Lifecycle steps of a batch job script.
//!
//! The container runs a single `/bin/sh -ec` script assembled from three
//! phases: post-start (prepare scratch space), run (the command itself) and
//! pre-stop (stage credentials, upload logs and artifacts). Each step renders
//! to one shell command; the script joins them with `&&`.

use crate::render::quote::{escape_double_quoted, shell_quote};

/// Where the secret volume with the storage key is mounted.
pub const SECRET_MOUNT_PATH: &str = "/etc/storage-pk";
/// Writable copy of the storage key; ssh refuses the mounted one's mode.
pub const STAGED_KEY_PATH: &str = "/tmp/storage-pk";
/// File the main command's combined output is captured into.
pub const LOG_FILE: &str = "build.log";

const SSH_OPTS: &str = "-o StrictHostKeyChecking=no";

/// Remote artifact store reached over ssh/scp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteStore {
    /// Login user on the storage server.
    pub hostname: String,
    pub servername: String,
    /// Base directory; each job uploads into `<target>/<job-name>`.
    pub target: String,
    pub job_name: String,
}

impl RemoteStore {
    fn login(&self) -> String {
        format!("{}@{}", self.hostname, self.servername)
    }

    fn job_dir(&self) -> String {
        format!("{}/{}", self.target, self.job_name)
    }
}

/// One shell command in the job script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Create an anonymous output directory before the command runs.
    MakeScratchDir { path: String },
    /// Run the command; its output is teed into the log so the pipeline's
    /// status is the tee's, and the job completes even if the command fails.
    Run { command_line: String },
    /// Copy the mounted key to a writable location.
    StageKey,
    /// Tighten the staged key's permissions.
    RestrictKey,
    /// Create the per-job directory on the store.
    MakeRemoteDir { store: RemoteStore },
    /// Upload a local file into the per-job directory.
    Upload { file: String, store: RemoteStore },
    /// Archive a scratch directory to `<name>.tar.gz`.
    Archive { name: String, path: String },
}

impl Step {
    /// Render the step as one shell command.
    pub fn to_shell(&self) -> String {
        match self {
            Step::MakeScratchDir { path } => format!("mkdir -p {}", shell_quote(path)),
            Step::Run { command_line } => format!(
                "/bin/sh -c \"{}\" 2>&1 | tee {}",
                escape_double_quoted(command_line),
                LOG_FILE
            ),
            Step::StageKey => format!("cp {}/* {}", SECRET_MOUNT_PATH, STAGED_KEY_PATH),
            Step::RestrictKey => format!("chmod 0600 {}", STAGED_KEY_PATH),
            Step::MakeRemoteDir { store } => format!(
                "ssh {} -i {} {} 'mkdir -p {}'",
                SSH_OPTS,
                STAGED_KEY_PATH,
                store.login(),
                store.job_dir()
            ),
            Step::Upload { file, store } => format!(
                "scp {} -i {} {} {}:{}/.",
                SSH_OPTS,
                STAGED_KEY_PATH,
                file,
                store.login(),
                store.job_dir()
            ),
            Step::Archive { name, path } => {
                format!("tar -czf {}.tar.gz {}", name, shell_quote(path))
            }
        }
    }
}

/// Ordered job script: post-start steps, the run step, pre-stop steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobScript {
    pub post_start: Vec<Step>,
    pub run: Step,
    pub pre_stop: Vec<Step>,
}

impl JobScript {
    /// Script for `command_line` with one scratch directory per out-flag.
    ///
    /// `out_dirs` pairs each out-flag's archive name (its target variable)
    /// with its scratch path.
    pub fn new(command_line: String, out_dirs: &[(String, String)], store: &RemoteStore) -> Self {
        let post_start = out_dirs
            .iter()
            .map(|(_, path)| Step::MakeScratchDir { path: path.clone() })
            .collect();

        let mut pre_stop = vec![
            Step::StageKey,
            Step::RestrictKey,
            Step::MakeRemoteDir {
                store: store.clone(),
            },
            Step::Upload {
                file: LOG_FILE.to_string(),
                store: store.clone(),
            },
        ];
        for (name, path) in out_dirs {
            pre_stop.push(Step::Archive {
                name: name.clone(),
                path: path.clone(),
            });
            pre_stop.push(Step::Upload {
                file: format!("{}.tar.gz", name),
                store: store.clone(),
            });
        }

        Self {
            post_start,
            run: Step::Run { command_line },
            pre_stop,
        }
    }

    /// All steps in execution order.
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.post_start
            .iter()
            .chain(std::iter::once(&self.run))
            .chain(self.pre_stop.iter())
    }

    /// Join all steps into one `sh -e` script.
    pub fn render(&self) -> String {
        self.steps()
            .map(Step::to_shell)
            .collect::<Vec<_>>()
            .join(" && ")
    }
}
