// file: errors.rs
// Purpose: Error types shared by the config store, the feed client and the feed parser.

use std::io;
use std::path::PathBuf;

/// The broad class of a failure, used by the binary to pick an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Network,
    Parse,
    Output,
}

#[derive(Debug, thiserror::Error)]
pub enum ClosingsError {
    #[error("config error: {0}")]
    Config(String),
    #[error("invalid school name '{0}': names cannot be blank or contain a comma, a double quote or a backslash")]
    InvalidName(String),
    #[error("config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    HttpStatus(u16),
    #[error("feed is not valid {0} text")]
    Encoding(String),
    #[error("xml feed parse error: {0}")]
    Parse(#[from] roxmltree::Error),
    #[error("feed is missing element <{0}>")]
    MissingElement(String),
    #[error("could not write output: {0}")]
    Output(#[from] io::Error),
}

impl From<config::ConfigError> for ClosingsError {
    fn from(err: config::ConfigError) -> Self {
        ClosingsError::Config(err.to_string())
    }
}

impl ClosingsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClosingsError::Config(_) | ClosingsError::InvalidName(_) | ClosingsError::ConfigIo { .. } => {
                ErrorKind::Config
            }
            ClosingsError::Network(_) | ClosingsError::HttpStatus(_) => ErrorKind::Network,
            ClosingsError::Encoding(_) | ClosingsError::Parse(_) | ClosingsError::MissingElement(_) => {
                ErrorKind::Parse
            }
            ClosingsError::Output(_) => ErrorKind::Output,
        }
    }

    /// Process exit status for this error: 2 config, 3 network, 4 feed parsing, 1 anything else.
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::Config => 2,
            ErrorKind::Network => 3,
            ErrorKind::Parse => 4,
            ErrorKind::Output => 1,
        }
    }
}
