// src/core/paths.rs

use std::path::{Path, PathBuf};

/// Returns the user's home directory as a string, if one can be determined.
pub fn home_dir_string() -> Option<String> {
    dirs::home_dir().map(|p| p.to_string_lossy().into_owned())
}

/// Resolves `path` against `root` when it is relative. Absolute paths are kept as-is.
pub fn anchor(root: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };
    dunce::simplified(&joined).to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_paths_are_joined_to_root() {
        let root = Path::new("/work/project");
        assert_eq!(
            anchor(root, Path::new("build/charts")),
            PathBuf::from("/work/project/build/charts")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_absolute_paths_are_kept() {
        let root = Path::new("/work/project");
        assert_eq!(
            anchor(root, Path::new("/tmp/charts")),
            PathBuf::from("/tmp/charts")
        );
    }
}
