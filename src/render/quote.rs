//! POSIX shell quoting.

/// Quote `arg` for a POSIX shell.
///
/// Values made only of safe characters pass through unchanged; anything else
/// is wrapped in single quotes with embedded quotes escaped as `'\''`.
pub fn shell_quote(arg: &str) -> String {
    if arg.is_empty() {
        return "''".to_string();
    }
    let safe = arg.chars().all(|ch| {
        matches!(
            ch,
            'a'..='z'
                | 'A'..='Z'
                | '0'..='9'
                | '_'
                | '-'
                | '.'
                | '/'
                | ':'
                | '@'
                | '+'
                | '='
                | ','
        )
    });
    if safe {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', "'\\''"))
}

/// Escape a string for use inside a double-quoted shell word.
pub fn escape_double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if matches!(ch, '"' | '\\' | '$' | '`') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_values_pass_through() {
        assert_eq!(shell_quote("/home/u/data"), "/home/u/data");
        assert_eq!(shell_quote("key=value"), "key=value");
    }

    #[test]
    fn unsafe_values_are_single_quoted() {
        assert_eq!(shell_quote("two words"), "'two words'");
        assert_eq!(shell_quote("it's"), "'it'\\''s'");
        assert_eq!(shell_quote("$HOME"), "'$HOME'");
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn double_quoted_escapes() {
        assert_eq!(escape_double_quoted(r#"a "b" $c"#), r#"a \"b\" \$c"#);
    }
}
