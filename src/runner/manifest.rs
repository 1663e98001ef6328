//! Nearest project manifest lookup.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::trace;

pub const PACKAGE_MANIFEST: &str = "package.json";

/// Walks from `path` towards the root and returns the deepest directory that
/// holds a `manifest` file. `path` itself is a candidate only if it is a
/// directory. A candidate that cannot be inspected counts as "no manifest
/// here" and the walk goes on.
pub fn find_manifest_dir(path: &Path, manifest: &str) -> Option<PathBuf> {
    for candidate in path.ancestors() {
        if candidate.as_os_str().is_empty() {
            continue;
        }
        match fs::metadata(candidate) {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => continue,
            Err(e) => {
                trace!(dir = %candidate.display(), error = %e, "Skipping unreadable candidate");
                continue;
            }
        }
        match fs::metadata(candidate.join(manifest)) {
            Ok(metadata) if metadata.is_file() => return Some(candidate.to_path_buf()),
            Ok(_) => {}
            Err(e) => {
                trace!(dir = %candidate.display(), error = %e, "No manifest");
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_deepest_manifest_wins() {
        let root = TempDir::new().unwrap();
        let deep = root.path().join("a/b/c");
        fs::create_dir_all(&deep).unwrap();
        fs::write(root.path().join("a/package.json"), "{}").unwrap();
        fs::write(root.path().join("a/b/package.json"), "{}").unwrap();
        let file = deep.join("file.ts");
        fs::write(&file, "").unwrap();

        assert_eq!(
            find_manifest_dir(&file, PACKAGE_MANIFEST),
            Some(root.path().join("a/b"))
        );
    }

    #[test]
    fn test_manifest_directory_is_not_a_manifest() {
        let root = TempDir::new().unwrap();
        let project = root.path().join("project");
        fs::create_dir_all(project.join("src/package.json")).unwrap();
        fs::write(project.join("package.json"), "{}").unwrap();
        let file = project.join("src/run.script.ts");
        fs::write(&file, "").unwrap();

        assert_eq!(find_manifest_dir(&file, PACKAGE_MANIFEST), Some(project));
    }

    #[test]
    fn test_missing_file_still_walks_ancestors() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("package.json"), "{}").unwrap();
        let file = root.path().join("not/created/yet.script.ts");

        assert_eq!(
            find_manifest_dir(&file, PACKAGE_MANIFEST),
            Some(root.path().to_path_buf())
        );
    }

    #[test]
    fn test_no_manifest_anywhere() {
        let root = TempDir::new().unwrap();
        let file = root.path().join("x/y.script.ts");
        fs::create_dir_all(root.path().join("x")).unwrap();
        assert_eq!(
            find_manifest_dir(&file, "definitely-not-a-manifest.json5"),
            None
        );
    }
}
