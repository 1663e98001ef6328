//! Terminal sessions, as provided by the host.

use std::env;
use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TerminalId(Uuid);

impl TerminalId {
    pub fn new() -> Self {
        TerminalId(Uuid::new_v4())
    }
}

impl Default for TerminalId {
    fn default() -> Self {
        TerminalId::new()
    }
}

impl fmt::Display for TerminalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hyphenated())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalOptions {
    pub name: String,
    pub cwd: PathBuf,
    /// Shown once when the terminal opens, before any command output.
    pub message: String,
}

pub trait Terminal {
    fn id(&self) -> TerminalId;

    fn name(&self) -> &str;

    /// Submits one command line, as if typed and followed by Enter.
    fn send_text(&mut self, text: &str) -> Result<()>;

    /// Brings the terminal into view.
    fn show(&mut self) -> Result<()>;

    fn dispose(&mut self);

    /// Blocks until everything sent so far has finished. Returns the exit
    /// code of the last command, if known. Hosts that cannot wait return
    /// `None` immediately.
    fn wait(&mut self) -> Result<Option<i32>> {
        Ok(None)
    }
}

pub trait TerminalHost {
    fn create_terminal(&mut self, options: TerminalOptions) -> Result<Box<dyn Terminal>>;
}

/// Holds the most recently started terminal. Storing a new one hands the
/// previous terminal back to the caller untouched; it keeps running.
#[derive(Default)]
pub struct ActiveTerminal {
    slot: Option<Box<dyn Terminal>>,
}

impl ActiveTerminal {
    pub fn new() -> Self {
        ActiveTerminal { slot: None }
    }

    pub fn replace(&mut self, terminal: Box<dyn Terminal>) -> Option<Box<dyn Terminal>> {
        self.slot.replace(terminal)
    }

    pub fn get(&self) -> Option<&dyn Terminal> {
        self.slot.as_deref()
    }

    pub fn get_mut(&mut self) -> Option<&mut (dyn Terminal + 'static)> {
        self.slot.as_deref_mut()
    }

    pub fn take(&mut self) -> Option<Box<dyn Terminal>> {
        self.slot.take()
    }
}

/// Native terminals: every command line runs in the user's shell with the
/// current process' stdio.
#[derive(Debug, Default)]
pub struct ShellTerminals;

impl TerminalHost for ShellTerminals {
    fn create_terminal(&mut self, options: TerminalOptions) -> Result<Box<dyn Terminal>> {
        let terminal = ShellTerminal::open(options)?;
        Ok(Box::new(terminal))
    }
}

pub struct ShellTerminal {
    id: TerminalId,
    options: TerminalOptions,
    children: Vec<Child>,
}

impl ShellTerminal {
    pub fn open(options: TerminalOptions) -> Result<Self> {
        let id = TerminalId::new();
        let mut stderr = io::stderr();
        writeln!(stderr, "{}", options.message).map_err(|source| Error::TerminalSpawn {
            name: options.name.clone(),
            source,
        })?;
        debug!(terminal = %id, name = %options.name, cwd = %options.cwd.display(), "Opened terminal");
        Ok(ShellTerminal {
            id,
            options,
            children: vec![],
        })
    }

    fn shell_command(text: &str) -> Command {
        if cfg!(windows) {
            let mut command = Command::new(env::var("COMSPEC").unwrap_or_else(|_| "cmd".to_string()));
            command.arg("/C").arg(text);
            command
        } else {
            let shell = env::var("SHELL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "/bin/sh".to_string());
            let mut command = Command::new(shell);
            command.arg("-c").arg(text);
            command
        }
    }
}

impl Terminal for ShellTerminal {
    fn id(&self) -> TerminalId {
        self.id
    }

    fn name(&self) -> &str {
        &self.options.name
    }

    fn send_text(&mut self, text: &str) -> Result<()> {
        let child = Self::shell_command(text)
            .current_dir(&self.options.cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| Error::TerminalSpawn {
                name: self.options.name.clone(),
                source,
            })?;
        info!(terminal = %self.id, pid = child.id(), command = text, "Process spawned");
        self.children.push(child);
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        debug!(terminal = %self.id, "Terminal output goes to the current console");
        Ok(())
    }

    fn dispose(&mut self) {
        let id = self.id;
        for child in &mut self.children {
            if let Err(e) = child.kill() {
                debug!(terminal = %id, error = %e, "Process already gone");
            }
        }
        self.children.clear();
    }

    fn wait(&mut self) -> Result<Option<i32>> {
        let name = &self.options.name;
        let mut code = None;
        for child in &mut self.children {
            let status = child.wait().map_err(|e| Error::Terminal {
                name: name.clone(),
                message: e.to_string(),
            })?;
            code = status.code();
        }
        self.children.clear();
        Ok(code)
    }
}
