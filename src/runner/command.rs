//! Command line and banner formatting.

use std::path::{Component, Path, PathBuf};

pub const FILE_PATH_PLACEHOLDER: &str = "{filePath}";
pub const SCRIPT_NAME_PLACEHOLDER: &str = "{scriptName}";

/// Fills the first `{filePath}` and then the first `{scriptName}` of the
/// template.
pub fn render_command(template: &str, relative_path: &str, script_name: &str) -> String {
    template
        .replacen(FILE_PATH_PLACEHOLDER, relative_path, 1)
        .replacen(SCRIPT_NAME_PLACEHOLDER, script_name, 1)
}

pub fn terminal_name(script_name: &str) -> String {
    let label = if script_name.is_empty() {
        "script"
    } else {
        script_name
    };
    format!("Run - {}", label)
}

/// Bold green script name, or the file when the script has no name.
pub fn running_banner(script_name: &str, relative_path: &str) -> String {
    let label = if script_name.is_empty() {
        relative_path
    } else {
        script_name
    };
    format!("Running script \x1b[1m\x1b[32m{}\x1b[0m", label)
}

/// Path of `target` as seen from `base`, with `/` separators. Both are made
/// absolute against `cwd` and normalised lexically first. Equal paths give
/// an empty string.
pub fn relative_slash_path(base: &Path, target: &Path, cwd: &Path) -> String {
    let base = normalize(&cwd.join(base));
    let target = normalize(&cwd.join(target));
    let base_parts: Vec<Component> = base.components().collect();
    let target_parts: Vec<Component> = target.components().collect();
    let common = base_parts
        .iter()
        .zip(target_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let mut parts: Vec<String> = vec![];
    for _ in common..base_parts.len() {
        parts.push("..".to_string());
    }
    for part in &target_parts[common..] {
        parts.push(part.as_os_str().to_string_lossy().into_owned());
    }
    parts.join("/").replace('\\', "/")
}

/// Resolves `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let at_root = matches!(
                    normalized.components().last(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                );
                if !at_root {
                    normalized.pop();
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_command() {
        assert_eq!(
            render_command("npx tsx {filePath} {scriptName}", "src/foo.script.ts", "abc"),
            "npx tsx src/foo.script.ts abc"
        );
    }

    #[test]
    fn test_render_replaces_first_occurrence_only() {
        assert_eq!(
            render_command("{scriptName} {filePath} {filePath} {scriptName}", "f.ts", "s"),
            "s f.ts {filePath} {scriptName}"
        );
        assert_eq!(render_command("echo hi", "f.ts", "s"), "echo hi");
    }

    #[test]
    fn test_terminal_name_and_banner() {
        assert_eq!(terminal_name("abc"), "Run - abc");
        assert_eq!(terminal_name(""), "Run - script");
        assert_eq!(
            running_banner("abc", "src/a.ts"),
            "Running script \u{1b}[1m\u{1b}[32mabc\u{1b}[0m"
        );
        assert!(running_banner("", "src/a.ts").contains("src/a.ts"));
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_paths() {
        let cwd = Path::new("/work");
        assert_eq!(
            relative_slash_path(Path::new("/p"), Path::new("/p/src/foo.script.ts"), cwd),
            "src/foo.script.ts"
        );
        assert_eq!(
            relative_slash_path(Path::new("/p/app"), Path::new("/p/lib/x.ts"), cwd),
            "../lib/x.ts"
        );
        assert_eq!(
            relative_slash_path(Path::new("/p/./a/../b"), Path::new("/p/b/c.ts"), cwd),
            "c.ts"
        );
        assert_eq!(relative_slash_path(Path::new("/p"), Path::new("/p"), cwd), "");
        assert_eq!(
            relative_slash_path(Path::new("proj"), Path::new("proj/x.ts"), cwd),
            "x.ts"
        );
    }
}
