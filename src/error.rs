use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The operator pressed one of the abort keys.
    #[error("user abort")]
    Aborted,

    #[error("can't access \"{}\": {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to save dictionary \"{}\": {}", .path.display(), .source)]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to build wordlist: {0}")]
    Dictionary(#[from] fst::Error),

    #[error("failed to build matcher: {0}")]
    Pattern(#[from] aho_corasick::BuildError),

    #[error("terminal input failed: {0}")]
    Input(#[source] io::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_abort(&self) -> bool {
        matches!(self, Error::Aborted)
    }
}
