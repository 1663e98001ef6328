//! User settings: which functions produce lenses and which files are scanned.
//!
//! Settings are never cached. Every lens request and every run reads them
//! again through a [`SettingsSource`], so edits apply immediately.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Settings section, as in `"fbc.scriptrunner.functions"`.
pub const CONFIG_SECTION: &str = "fbc.scriptrunner";
pub const DEFAULT_FILE_PATTERN: &str = "**/*.script.{js,jsx,ts,tsx}";
pub const DEFAULT_FUNCTION: &str = "script";

lazy_static! {
    static ref DEFAULT_FUNCTIONS: FunctionConfig = {
        let mut functions = BTreeMap::new();
        functions.insert(
            DEFAULT_FUNCTION.to_string(),
            FunctionEntry {
                title: "Run script".to_string(),
                command: "npx tsx {filePath} {scriptName}".to_string(),
            },
        );
        FunctionConfig(functions)
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionEntry {
    pub title: String,
    /// Command template with `{filePath}` and `{scriptName}` placeholders.
    pub command: String,
}

/// Function name key to lens entry. Keys are iterated in lexicographic order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FunctionConfig(BTreeMap<String, FunctionEntry>);

impl FunctionConfig {
    pub fn new() -> Self {
        FunctionConfig(BTreeMap::new())
    }

    pub fn with_entry(mut self, key: &str, title: &str, command: &str) -> Self {
        self.insert(key, title, command);
        self
    }

    pub fn insert(&mut self, key: &str, title: &str, command: &str) {
        self.0.insert(
            key.to_string(),
            FunctionEntry {
                title: title.to_string(),
                command: command.to_string(),
            },
        );
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&FunctionEntry> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FunctionEntry)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries bound to calls of `function_name`: the key itself and every
    /// `function_name-<suffix>` variant.
    pub fn entries_for<'a>(
        &'a self,
        function_name: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a FunctionEntry)> + 'a {
        self.iter()
            .filter(move |(key, _)| is_variant_of(key, function_name))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for FunctionConfig {
    fn default() -> Self {
        DEFAULT_FUNCTIONS.clone()
    }
}

fn is_variant_of(key: &str, function_name: &str) -> bool {
    key == function_name
        || (key.len() > function_name.len()
            && key.starts_with(function_name)
            && key[function_name.len()..].starts_with('-'))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub functions: FunctionConfig,
    #[serde(default = "default_file_pattern")]
    pub file_pattern: String,
}

fn default_file_pattern() -> String {
    DEFAULT_FILE_PATTERN.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            functions: FunctionConfig::default(),
            file_pattern: default_file_pattern(),
        }
    }
}

impl Settings {
    /// Reads settings from an editor style JSON object. Both flat dotted keys
    /// (`"fbc.scriptrunner.functions"`) and a nested `"fbc.scriptrunner"`
    /// object are accepted; flat keys win. Unrelated keys are ignored.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(content)?;
        let mut section = match root.get(CONFIG_SECTION) {
            Some(Value::Object(nested)) => nested.clone(),
            _ => serde_json::Map::new(),
        };
        if let Value::Object(entries) = &root {
            let prefix = format!("{}.", CONFIG_SECTION);
            for (key, value) in entries {
                if let Some(name) = key.strip_prefix(prefix.as_str()) {
                    section.insert(name.to_string(), value.clone());
                }
            }
        }
        Ok(serde_json::from_value(Value::Object(section))?)
    }

    pub fn file_pattern(&self) -> Result<FilePattern> {
        FilePattern::new(&self.file_pattern)
    }
}

/// Where settings come from. Implementations must not cache.
pub trait SettingsSource {
    fn load(&self) -> Settings;
}

impl SettingsSource for Settings {
    fn load(&self) -> Settings {
        self.clone()
    }
}

/// A JSON settings file, re-read on every [`SettingsSource::load`]. A missing
/// file means defaults; an unreadable or malformed one is reported and also
/// falls back to defaults.
#[derive(Debug, Clone)]
pub struct JsonSettingsFile {
    path: PathBuf,
}

impl JsonSettingsFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        JsonSettingsFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn try_load(&self) -> Result<Settings> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Settings file not found, using defaults");
                return Ok(Settings::default());
            }
            Err(source) => {
                return Err(Error::SettingsIo {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        Settings::from_json_str(&content)
    }
}

impl SettingsSource for JsonSettingsFile {
    fn load(&self) -> Settings {
        match self.try_load() {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to load settings, using defaults");
                Settings::default()
            }
        }
    }
}

/// Glob restricting which files get lenses. Supports `**`, `*`, `?`, `[..]`
/// and `{a,b}` alternatives (expanded before compiling).
#[derive(Debug, Clone)]
pub struct FilePattern {
    source: String,
    patterns: Vec<Pattern>,
}

impl FilePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let patterns = expand_braces(pattern)
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|source| Error::FilePattern {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(FilePattern {
            source: pattern.to_string(),
            patterns,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Matches the path with forward slashes and without its root, so
    /// `**/x` style patterns apply to absolute paths too.
    pub fn matches(&self, path: &Path) -> bool {
        let candidate = rootless_slash_path(path);
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };
        self.patterns
            .iter()
            .any(|p| p.matches_with(&candidate, options))
    }
}

fn rootless_slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            Component::Prefix(_) | Component::RootDir | Component::CurDir => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// `a{b,c{d,e}}f` -> `abf`, `acdf`, `acef`. Unbalanced braces are kept
/// literally.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let bytes = pattern.as_bytes();
    let open = match pattern.find('{') {
        Some(open) => open,
        None => return vec![pattern.to_string()],
    };
    let mut depth = 0;
    let mut close = None;
    let mut splits = vec![];
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    break;
                }
            }
            b',' if depth == 1 => splits.push(i),
            _ => {}
        }
    }
    let close = match close {
        Some(close) => close,
        None => return vec![pattern.to_string()],
    };
    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];
    let mut bounds = vec![open];
    bounds.extend(splits);
    bounds.push(close);
    let mut expanded = vec![];
    for window in bounds.windows(2) {
        let alternative = &pattern[window[0] + 1..window[1]];
        for tail in expand_braces(&format!("{}{}{}", prefix, alternative, suffix)) {
            if !expanded.contains(&tail) {
                expanded.push(tail);
            }
        }
    }
    expanded
}
