//! Code lenses: clickable annotations above script calls.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{FunctionConfig, SettingsSource};
use crate::document::{Range, TextDocument};
use crate::runner::{RunRequest, RUN_COMMAND_ID};
use crate::scanner::{DocumentScan, ScriptCall};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LensCommand {
    pub title: String,
    pub command: String,
    pub arguments: RunRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeLens {
    pub range: Range,
    pub command: LensCommand,
}

/// One lens per configured entry whose key is the call's function name or a
/// `name-<suffix>` variant of it, in key order.
pub fn bind_lenses<I>(path: &Path, calls: I, functions: &FunctionConfig) -> Vec<CodeLens>
where
    I: IntoIterator<Item = ScriptCall>,
{
    let mut lenses = vec![];
    for call in calls {
        for (_, entry) in functions.entries_for(&call.function_name) {
            lenses.push(CodeLens {
                range: call.range,
                command: LensCommand {
                    title: entry.title.clone(),
                    command: RUN_COMMAND_ID.to_string(),
                    arguments: RunRequest {
                        file_path: Some(path.to_path_buf()),
                        command_template: Some(entry.command.clone()),
                        script_name: call.script_name.clone(),
                        is_debug: false,
                    },
                },
            });
        }
    }
    lenses
}

/// Answers lens requests for documents, reading settings fresh each time.
pub struct LensProvider<S> {
    settings: S,
}

impl<S: SettingsSource> LensProvider<S> {
    pub fn new(settings: S) -> Self {
        LensProvider { settings }
    }

    pub fn provide_code_lenses(&self, document: &TextDocument) -> Vec<CodeLens> {
        let settings = self.settings.load();
        if settings.functions.is_empty() {
            debug!("No functions configured, no lenses");
            return vec![];
        }
        let language = match document.language_id() {
            Some(language) => language,
            None => {
                debug!(path = %document.path().display(), "Not a script language, no lenses");
                return vec![];
            }
        };
        let pattern = match settings.file_pattern() {
            Ok(pattern) => pattern,
            Err(e) => {
                warn!(error = %e, "Unusable file pattern, no lenses");
                return vec![];
            }
        };
        if !pattern.matches(document.path()) {
            debug!(
                path = %document.path().display(),
                pattern = pattern.as_str(),
                "File does not match pattern, no lenses"
            );
            return vec![];
        }
        let scan = match DocumentScan::parse(document) {
            Ok(scan) => scan,
            Err(e) => {
                warn!(error = %e, "Failed to scan document");
                return vec![];
            }
        };
        let lenses = bind_lenses(
            document.path(),
            scan.script_calls(&settings.functions),
            &settings.functions,
        );
        debug!(
            path = %document.path().display(),
            language = language.as_str(),
            lenses = lenses.len(),
            "Provided code lenses"
        );
        lenses
    }
}
