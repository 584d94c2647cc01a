//! Filesystem and path utilities.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Berth.toml";

/// JSON encoding of the manifest.
pub const MANIFEST_JSON_NAME: &str = "Berth.json";

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Find the manifest in `start` or any of its parents.
///
/// `Berth.toml` wins over `Berth.json` when both exist in one directory.
pub fn find_manifest(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in [MANIFEST_NAME, MANIFEST_JSON_NAME] {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Lexically normalize a relative path.
///
/// Drops `.` segments and folds `..` into the preceding segment. Returns
/// `None` for absolute paths and for paths that climb above their base.
/// The empty path stands for the base itself.
pub fn normalize_relative(path: &Path) -> Option<PathBuf> {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::Normal(part) => normalized.push(part),
            Component::ParentDir => {
                if !normalized.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_relative() {
        assert_eq!(
            normalize_relative(Path::new("./TableKit/")),
            Some(PathBuf::from("TableKit"))
        );
        assert_eq!(
            normalize_relative(Path::new("include/../headers")),
            Some(PathBuf::from("headers"))
        );
        assert_eq!(normalize_relative(Path::new(".")), Some(PathBuf::new()));
        assert_eq!(normalize_relative(Path::new("../other")), None);
        assert_eq!(normalize_relative(Path::new("include/../../x")), None);
        assert_eq!(normalize_relative(Path::new("/usr/include")), None);
    }

    #[test]
    fn test_find_manifest_walks_up() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("TableKit").join("include");
        fs::create_dir_all(&nested).unwrap();
        fs::write(tmp.path().join(MANIFEST_NAME), "name = \"TableKit\"\n").unwrap();

        let found = find_manifest(&nested).unwrap();
        assert_eq!(found, tmp.path().join(MANIFEST_NAME));
    }

    #[test]
    fn test_find_manifest_prefers_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(MANIFEST_JSON_NAME), "{}").unwrap();
        fs::write(tmp.path().join(MANIFEST_NAME), "").unwrap();

        assert_eq!(
            find_manifest(tmp.path()).unwrap(),
            tmp.path().join(MANIFEST_NAME)
        );
    }
}
