use std::path::{Path, PathBuf};

/// What the runner needs to know about the editor state.
pub trait Workspace {
    /// Path of the focused document, if any.
    fn active_document(&self) -> Option<PathBuf>;

    /// Open workspace folders, first one is the primary.
    fn workspace_folders(&self) -> Vec<PathBuf>;
}

/// Workspace state given on the command line.
#[derive(Debug, Clone, Default)]
pub struct NativeWorkspace {
    folders: Vec<PathBuf>,
    active_document: Option<PathBuf>,
}

impl NativeWorkspace {
    pub fn new(folders: Vec<PathBuf>) -> Self {
        NativeWorkspace {
            folders,
            active_document: None,
        }
    }

    pub fn focus(&mut self, document: &Path) {
        self.active_document = Some(document.to_path_buf());
    }
}

impl Workspace for NativeWorkspace {
    fn active_document(&self) -> Option<PathBuf> {
        self.active_document.clone()
    }

    fn workspace_folders(&self) -> Vec<PathBuf> {
        self.folders.clone()
    }
}
