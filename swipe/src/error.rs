use app_dirs::AppDirsError;
use libswipe::Direction;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("usage: swipe <trace.toml> [config.toml]")]
    Usage,
    #[error("couldn't find the config directory: {0}")]
    ConfigDir(#[from] AppDirsError),
    #[error("couldn't read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("{0}")]
    Toml(#[from] toml::de::Error),
    #[error("unknown algorithm {0:?}")]
    UnknownAlgorithm(String),
    #[error("{name} must be a non-negative number, not {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
    #[error("unable to parse gesture {0:?}")]
    BadGesture(String),
    #[error("more than one binding for swipe {0}")]
    DuplicateBinding(Direction),
    #[error("event {index}: {reason}")]
    BadEvent { index: usize, reason: String },
    #[error("{}: {source}", path.display())]
    InFile { path: PathBuf, source: Box<Error> },
}

impl Error {
    pub fn io(path: &Path, source: io::Error) -> Error {
        Error::Io {
            path: path.to_owned(),
            source,
        }
    }

    /// Attaches the name of the file that caused this error.
    pub fn in_file(self, path: &Path) -> Error {
        Error::InFile {
            path: path.to_owned(),
            source: Box::new(self),
        }
    }
}
