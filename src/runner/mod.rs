//! Running a script in a terminal, the action behind every lens.

pub mod command;
pub mod manifest;
pub mod terminal;
pub mod workspace;

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use command::{relative_slash_path, render_command, running_banner, terminal_name};
use manifest::{find_manifest_dir, PACKAGE_MANIFEST};
use terminal::{ActiveTerminal, Terminal, TerminalHost, TerminalId, TerminalOptions};
use workspace::Workspace;

pub const RUN_COMMAND_ID: &str = "fbc.scriptrunner.run";

pub const DEFAULT_SCRIPT_NAME: &str = "default";

fn default_script_name() -> String {
    DEFAULT_SCRIPT_NAME.to_string()
}

/// Arguments of the run command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    #[serde(default)]
    pub file_path: Option<PathBuf>,
    #[serde(default)]
    pub command_template: Option<String>,
    #[serde(default = "default_script_name")]
    pub script_name: String,
    #[serde(default)]
    pub is_debug: bool,
}

impl Default for RunRequest {
    fn default() -> Self {
        RunRequest {
            file_path: None,
            command_template: None,
            script_name: default_script_name(),
            is_debug: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub terminal_id: TerminalId,
    pub cwd: PathBuf,
    pub command: String,
    pub relative_path: String,
}

pub struct Runner<W, H> {
    workspace: W,
    host: H,
    active: ActiveTerminal,
}

impl<W: Workspace, H: TerminalHost> Runner<W, H> {
    pub fn new(workspace: W, host: H) -> Self {
        Runner {
            workspace,
            host,
            active: ActiveTerminal::new(),
        }
    }

    pub fn active_terminal(&self) -> Option<&dyn Terminal> {
        self.active.get()
    }

    pub fn active_terminal_mut(&mut self) -> Option<&mut (dyn Terminal + 'static)> {
        self.active.get_mut()
    }

    pub fn take_active_terminal(&mut self) -> Option<Box<dyn Terminal>> {
        self.active.take()
    }

    /// Runs `request` in a fresh terminal. A request without a command
    /// template, or without a file when nothing is focused, does nothing and
    /// gives `Ok(None)`. Relative file paths are taken from the process cwd.
    ///
    /// The previously active terminal is forgotten, not disposed.
    pub fn run(&mut self, request: RunRequest) -> Result<Option<RunOutcome>> {
        let template = match request.command_template.as_deref() {
            Some(template) if !template.is_empty() => template,
            _ => {
                debug!("No command template, nothing to run");
                return Ok(None);
            }
        };
        let file_path = match request
            .file_path
            .clone()
            .or_else(|| self.workspace.active_document())
        {
            Some(path) => path,
            None => {
                debug!("No file to run");
                return Ok(None);
            }
        };
        let process_cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let file_path = if file_path.is_relative() {
            process_cwd.join(file_path)
        } else {
            file_path
        };
        let script_name = request.script_name.as_str();
        info!(
            file = %file_path.display(),
            script = script_name,
            debug = request.is_debug,
            "Running"
        );

        let cwd = find_manifest_dir(&file_path, PACKAGE_MANIFEST)
            .or_else(|| self.workspace.workspace_folders().into_iter().next())
            .unwrap_or_else(|| process_cwd.clone());
        let relative_path = relative_slash_path(&cwd, &file_path, &process_cwd);
        let command = render_command(template, &relative_path, script_name);
        debug!(cwd = %cwd.display(), command = %command, "Resolved command");

        let options = TerminalOptions {
            name: terminal_name(script_name),
            cwd: cwd.clone(),
            message: running_banner(script_name, &relative_path),
        };
        let mut terminal = self.host.create_terminal(options)?;
        terminal.send_text(&command)?;
        terminal.show()?;
        let terminal_id = terminal.id();
        if let Some(previous) = self.active.replace(terminal) {
            debug!(terminal = %previous.id(), "Previous terminal left running");
        }

        Ok(Some(RunOutcome {
            terminal_id,
            cwd,
            command,
            relative_path,
        }))
    }
}
