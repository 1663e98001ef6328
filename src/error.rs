use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::parser::Rule;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to parse {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: Box<pest::error::Error<Rule>>,
    },

    #[error("failed to read settings file {path}: {source}")]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid settings: {0}")]
    SettingsFormat(#[from] serde_json::Error),

    #[error("invalid file pattern {pattern:?}: {source}")]
    FilePattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to start terminal {name:?}: {source}")]
    TerminalSpawn {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("terminal {name:?} is not usable: {message}")]
    Terminal { name: String, message: String },
}

impl Error {
    pub fn parse(file: &str, source: pest::error::Error<Rule>) -> Self {
        Error::Parse {
            file: file.to_string(),
            source: Box::new(source),
        }
    }
}
