#![allow(dead_code)]

use cmdsignature::resolve::Overrides;
use cmdsignature::signature::SignatureTable;
use cmdsignature::{Interpretation, Interpreter, Invocation};

/// Signature used across render tests.
///
/// - `output`: out-directory, defaults to the working directory
/// - `source`: directory without direction
/// - `config`: file
/// - `message`: string with a default
/// - `verbose`: boolean
pub const BUILD_SIGNATURE: &str = r#"
flags:
  - name: output
    long: output
    target: result_dir
    type: directory
    direction: out
  - name: source
    long: source
    type: directory
  - name: config
    long: config
    type: file
  - name: message
    long: message
    type: string
    default: hello
  - name: verbose
    long: verbose
    short: v
    type: boolean
args:
  - name: package
  - name: version
"#;

pub const WORKDIR: &str = "/home/u/work";

pub fn table(yaml: &str) -> SignatureTable {
    SignatureTable::from_yaml_str(yaml).expect("signature should parse")
}

pub fn argv(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

pub fn invocation() -> Invocation {
    Invocation::new("gofed", "build", "nightly", "gofed/gofed:v1")
}

pub fn interpret(table: &SignatureTable, args: &[&str], overrides: &Overrides) -> Interpretation {
    Interpreter::new(table)
        .with_cwd(WORKDIR)
        .interpret(&argv(args), overrides)
        .expect("interpretation should succeed")
}
