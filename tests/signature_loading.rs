use cmdsignature::signature::{
    DefaultAction, Direction, FsKind, OptionValue, SignatureError, SignatureTable, ValueKind,
};

const SIGNATURE: &str = r#"
flags:
  - name: output
    long: output-dir
    short: o
    type: directory
    direction: out
    default-action: set-cwd
    description: Where results are written
  - name: manifest
    long: manifest
    type: file
  - name: retries
    long: retries
    type: integer
    default: 3
  - name: future
    long: future
    type: directory
    default-action: set-from-env
args:
  - name: package
    description: Package to build
  - name: workdir
    type: directory
    default-action: set-cwd
"#;

#[test]
fn descriptors_are_parsed() {
    let table = SignatureTable::from_yaml_str(SIGNATURE).unwrap();

    let output = table.flag("output").unwrap();
    assert_eq!(output.kind(), ValueKind::Path(FsKind::Dir));
    assert_eq!(output.direction, Some(Direction::Out));
    assert_eq!(output.default_action, Some(DefaultAction::SetCwd));
    assert_eq!(output.target(), "output_dir");
    assert!(output.matches("-o"));

    assert!(table.flag("manifest").unwrap().kind().is_fs_file());
    assert_eq!(
        table.flag("retries").unwrap().default_value(),
        OptionValue::Int(3)
    );
    assert_eq!(
        table.flag("future").unwrap().default_action,
        Some(DefaultAction::Unsupported)
    );
    assert_eq!(table.flag_by_long("output-dir").unwrap().name, "output");
}

#[test]
fn positional_descriptors_are_ordered() {
    let table = SignatureTable::from_yaml_str(SIGNATURE).unwrap();
    let bound = table.bind_positionals(&["golang-x-net".to_string()]);
    assert_eq!(bound[0].name, "package");
    assert_eq!(bound[0].value, "golang-x-net");
    assert_eq!(bound[1].default_action, Some(DefaultAction::SetCwd));
    assert!(bound[1].kind.is_fs_dir());
}

#[test]
fn invalid_yaml_is_a_parse_error() {
    assert!(matches!(
        SignatureTable::from_yaml_str("flags: ["),
        Err(SignatureError::ParseError { .. })
    ));
}

#[test]
fn duplicate_long_rejected() {
    let yaml = "flags:\n  - {name: a, long: same}\n  - {name: b, long: same}\n";
    assert!(matches!(
        SignatureTable::from_yaml_str(yaml),
        Err(SignatureError::DuplicateFlag { .. })
    ));
}

#[test]
fn load_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("build.yml");
    std::fs::write(&path, SIGNATURE).unwrap();
    assert_eq!(SignatureTable::load(&path).unwrap().flags().len(), 4);

    assert!(matches!(
        SignatureTable::load(&dir.path().join("missing.yml")),
        Err(SignatureError::ReadError { .. })
    ));
}

#[test]
fn usage_mentions_every_flag() {
    let table = SignatureTable::from_yaml_str(SIGNATURE).unwrap();
    let usage = table.usage("gofed", "build");
    for long in ["--output-dir", "--manifest", "--retries", "--future"] {
        assert!(usage.contains(long), "usage missing {long}");
    }
    assert!(usage.contains("Where results are written"));
}
