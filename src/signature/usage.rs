//! Usage text for a single command signature.

use crate::signature::table::SignatureTable;
use crate::signature::types::ValueKind;

impl SignatureTable {
    /// Render a usage/help text for `program command`.
    pub fn usage(&self, program: &str, command: &str) -> String {
        let mut out = format!("Usage: {} {} [OPTIONS]", program, command);
        for arg in self.positional_descriptors() {
            out.push_str(&format!(" [{}]", arg.name.to_uppercase()));
        }
        out.push('\n');

        let rows: Vec<(String, String)> = self
            .flags()
            .iter()
            .map(|flag| {
                let mut left = match &flag.short {
                    Some(s) => format!("-{}, --{}", s, flag.long),
                    None => format!("    --{}", flag.long),
                };
                if flag.kind() != ValueKind::Boolean {
                    left.push_str(&format!(" <{}>", flag.declared.label()));
                }
                (left, flag.description.clone().unwrap_or_default())
            })
            .collect();

        if !rows.is_empty() {
            out.push_str("\nOptions:\n");
            let width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
            for (left, desc) in rows {
                out.push_str(&format!("  {:width$}  {}\n", left, desc, width = width));
            }
        }

        if !self.positional_descriptors().is_empty() {
            out.push_str("\nArguments:\n");
            for arg in self.positional_descriptors() {
                out.push_str(&format!(
                    "  {}  {}\n",
                    arg.name.to_uppercase(),
                    arg.description.as_deref().unwrap_or_default()
                ));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use crate::signature::SignatureTable;

    #[test]
    fn usage_lists_flags_and_args() {
        let table = SignatureTable::from_yaml_str(
            r#"
flags:
  - {name: verbose, long: verbose, short: v, type: boolean, description: Verbose output}
  - {name: out, long: output, type: directory, description: Where results go}
args:
  - {name: source, description: Input tree}
"#,
        )
        .unwrap();

        let usage = table.usage("gofed", "build");
        assert!(usage.starts_with("Usage: gofed build [OPTIONS] [SOURCE]"));
        assert!(usage.contains("-v, --verbose"));
        assert!(usage.contains("--output <directory>"));
        assert!(usage.contains("Where results go"));
        assert!(usage.contains("SOURCE  Input tree"));
    }
}
