use std::path::{Path, PathBuf};

/// convert a worktree-relative filesystem path to the unix-separated form used
/// in trees and index entries
pub fn to_unix_str(path: &Path) -> String {
    let s = path.to_str().expect("non utf-8 path in worktree");
    if std::path::MAIN_SEPARATOR == '/' { s.to_owned() } else { s.replace(std::path::MAIN_SEPARATOR, "/") }
}

pub fn to_fs_path(base: &Path, unix_path: &str) -> PathBuf {
    let mut path = base.to_path_buf();
    for component in unix_path.split('/') {
        path.push(component);
    }
    path
}

/// the proper (strict) prefixes of `path`: for `a/b/c` yields `a`, `a/b`
pub fn parent_components(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices('/').map(move |(i, _)| &path[..i])
}

/// the directory portion of a unix path, or None for a top-level file
pub fn parent_dir(path: &str) -> Option<&str> {
    path.rfind('/').map(|i| &path[..i])
}

pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_components() {
        assert_eq!(parent_components("a/b/c").collect::<Vec<_>>(), vec!["a", "a/b"]);
        assert_eq!(parent_components("a").count(), 0);
    }

    #[test]
    fn test_parent_dir_and_file_name() {
        assert_eq!(parent_dir("a/b/c"), Some("a/b"));
        assert_eq!(parent_dir("a"), None);
        assert_eq!(file_name("a/b/c"), "c");
        assert_eq!(file_name("c"), "c");
    }
}
