//! Lexical path helpers.

use std::path::{Component, Path, PathBuf};

/// Make `path` absolute against `cwd` and collapse `.`/`..` lexically.
///
/// No filesystem access; symlinks are left alone. An empty path resolves to
/// `cwd` itself.
pub fn absolutize(path: &str, cwd: &Path) -> String {
    let joined = if Path::new(path).is_absolute() {
        PathBuf::from(path)
    } else {
        cwd.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }

    if out.as_os_str().is_empty() {
        return "/".to_string();
    }
    out.to_string_lossy().into_owned()
}

/// Absolute directory containing `path`.
pub fn parent_dir(path: &str, cwd: &Path) -> String {
    let abs = absolutize(path, cwd);
    match Path::new(&abs).parent() {
        Some(parent) => parent.to_string_lossy().into_owned(),
        None => abs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_joins_cwd() {
        assert_eq!(absolutize("data", Path::new("/home/u")), "/home/u/data");
    }

    #[test]
    fn dots_collapse() {
        assert_eq!(absolutize("./a/../b/", Path::new("/home/u")), "/home/u/b");
        assert_eq!(absolutize("/x/./y/..", Path::new("/ignored")), "/x");
        assert_eq!(absolutize("../../..", Path::new("/a")), "/");
    }

    #[test]
    fn empty_is_cwd() {
        assert_eq!(absolutize("", Path::new("/srv")), "/srv");
    }

    #[test]
    fn parent_of_file() {
        assert_eq!(parent_dir("conf/app.yml", Path::new("/etc")), "/etc/conf");
        assert_eq!(parent_dir("/app.yml", Path::new("/etc")), "/");
    }
}
