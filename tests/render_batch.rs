mod common;

use cmdsignature::config::BatchConfig;
use cmdsignature::render::batch;
use cmdsignature::resolve::Overrides;
use cmdsignature::signature::SignatureTable;
use cmdsignature::{ConfigurationError, RenderError};
use common::{interpret, invocation, table, BUILD_SIGNATURE};

fn render(t: &SignatureTable, args: &[&str]) -> Result<batch::Job, RenderError> {
    let interpretation = interpret(t, args, &Overrides::new());
    batch::render(&interpretation, t, &invocation(), &BatchConfig::default())
}

fn script(job: &batch::Job) -> &str {
    job.script().expect("job should carry a script")
}

#[test]
fn document_shape() {
    let t = table(BUILD_SIGNATURE);
    let job = render(&t, &["-v"]).unwrap();

    assert_eq!(job.api_version, "batch/v1");
    assert_eq!(job.kind, "Job");
    assert!(job.metadata.name.starts_with("job-nightly-build-"));
    assert_eq!(job.spec.template.metadata.name, job.metadata.name);

    let pod = &job.spec.template.spec;
    assert_eq!(pod.restart_policy, "Never");
    assert_eq!(pod.containers.len(), 1);
    assert_eq!(pod.volumes[0].secret.secret_name, "storage-pk");

    let container = job.container().unwrap();
    assert_eq!(container.image, "gofed/gofed:v1");
    assert_eq!(container.command[0], "/bin/sh");
    assert_eq!(container.command[1], "-ec");
    assert_eq!(container.volume_mounts[0].mount_path, "/etc/storage-pk");
    assert!(container.volume_mounts[0].read_only);
}

#[test]
fn job_names_are_unique() {
    let t = table(BUILD_SIGNATURE);
    let a = render(&t, &[]).unwrap();
    let b = render(&t, &[]).unwrap();
    assert_ne!(a.metadata.name, b.metadata.name);
}

#[test]
fn out_flag_is_redirected_archived_and_uploaded() {
    let t = table(BUILD_SIGNATURE);
    let job = render(&t, &["--output", "/home/u/results"]).unwrap();
    let script = script(&job);

    let mkdir = script
        .find("mkdir -p /tmp/var/run/ichiba/output")
        .expect("scratch dir step");
    let run = script
        .find("gofed build --output /tmp/var/run/ichiba/output")
        .expect("main command");
    let archive = script
        .find("tar -czf result_dir.tar.gz /tmp/var/run/ichiba/output")
        .expect("archive step");
    let upload = script
        .find("result_dir.tar.gz ichiba@storage:/var/www/html/pub/ichiba/")
        .expect("upload step");

    assert!(mkdir < run);
    assert!(run < archive);
    assert!(archive < upload);
    assert!(!script.contains("/home/u/results"));
}

#[test]
fn script_captures_logs_and_stages_key() {
    let t = table(BUILD_SIGNATURE);
    let job = render(&t, &["--message", "hi there"]).unwrap();
    let script = script(&job);

    assert!(script.starts_with(
        "/bin/sh -c \"gofed build --message 'hi there'\" 2>&1 | tee build.log"
    ));
    let cp = script.find("cp /etc/storage-pk/* /tmp/storage-pk").unwrap();
    let chmod = script.find("chmod 0600 /tmp/storage-pk").unwrap();
    let log = script.find("build.log ichiba@storage:").unwrap();
    assert!(cp < chmod && chmod < log);
    assert!(script.contains(&format!("'mkdir -p /var/www/html/pub/ichiba/{}'", job.metadata.name)));
}

#[test]
fn config_knobs_reach_upload_steps() {
    let t = table(BUILD_SIGNATURE);
    let interpretation = interpret(&t, &[], &Overrides::new());
    let config = BatchConfig {
        hostname: "builder".into(),
        servername: "artifacts.example.org".into(),
        target: "/srv/pub".into(),
        ..BatchConfig::default()
    };
    let job = batch::render(&interpretation, &t, &invocation(), &config).unwrap();
    assert!(job
        .script()
        .unwrap()
        .contains("builder@artifacts.example.org:/srv/pub/job-nightly-build-"));
}

#[test]
fn scratch_paths_are_shell_quoted() {
    let t = table(BUILD_SIGNATURE);
    let interpretation = interpret(&t, &["--output", "/home/u/results"], &Overrides::new());
    let config = BatchConfig {
        scratch_root: "/tmp/my scratch".into(),
        ..BatchConfig::default()
    };
    let job = batch::render(&interpretation, &t, &invocation(), &config).unwrap();
    let script = job.script().unwrap();

    assert!(script.starts_with("mkdir -p '/tmp/my scratch/output' && "));
    assert!(script.contains("gofed build --output '/tmp/my scratch/output'"));
    assert!(script.contains("tar -czf result_dir.tar.gz '/tmp/my scratch/output'"));
}

#[test]
fn missing_direction_fails() {
    let t = table(BUILD_SIGNATURE);
    let err = render(&t, &["--source", "/src"]).unwrap_err();
    assert_eq!(
        err,
        RenderError::Configuration(ConfigurationError::MissingDirection {
            flag: "source".into()
        })
    );
}

#[test]
fn default_directory_without_direction_is_fine() {
    // `source` is not in the non-default set, so its direction is irrelevant.
    let t = table(BUILD_SIGNATURE);
    assert!(render(&t, &["-v"]).is_ok());
}

#[test]
fn input_direction_is_unsupported() {
    let t = table(
        r#"
flags:
  - {name: input, long: input, type: directory, direction: in}
"#,
    );
    let err = render(&t, &["--input", "/data"]).unwrap_err();
    assert!(matches!(
        err,
        RenderError::Configuration(ConfigurationError::UnsupportedInputDirection { .. })
    ));
}

#[test]
fn help_is_unsupported() {
    let t = table(BUILD_SIGNATURE);
    let err = render(&t, &["-h"]).unwrap_err();
    assert!(matches!(err, RenderError::Unsupported { operation: "help", .. }));
}

#[test]
fn serializes_with_kubernetes_field_names() {
    let t = table(BUILD_SIGNATURE);
    let job = render(&t, &[]).unwrap();
    let yaml = serde_yaml::to_string(&job).unwrap();
    assert!(yaml.contains("apiVersion: batch/v1"));
    assert!(yaml.contains("restartPolicy: Never"));
    assert!(yaml.contains("volumeMounts:"));
    assert!(yaml.contains("secretName: storage-pk"));

    let json = serde_json::to_value(&job).unwrap();
    let mount = &json["spec"]["template"]["spec"]["containers"][0]["volumeMounts"][0];
    assert_eq!(mount["readOnly"], true);
}
