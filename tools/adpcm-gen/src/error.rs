//! Error types for table generation.

use std::path::PathBuf;

use crate::encoder::EncodeError;
use crate::framing::FramingError;
use crate::wave::PayloadError;

/// Errors produced while selecting, encoding, and assembling samples.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Sample directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Encoder executable not found: {0}")]
    EncoderNotFound(String),

    #[error("Failed to encode {}: {source}", path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: EncodeError,
    },

    #[error("Failed to frame {}: {source}", path.display())]
    Framing {
        path: PathBuf,
        #[source]
        source: FramingError,
    },

    #[error("Encoded payload of {} is not loadable: {source}", path.display())]
    Payload {
        path: PathBuf,
        #[source]
        source: PayloadError,
    },

    #[error("Cannot derive a symbol name from {}", .0.display())]
    InvalidName(PathBuf),

    #[error("Symbol '{name}' is produced by both {} and {}", first.display(), second.display())]
    DuplicateName {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("'{symbol}' (from {}) is not a valid C identifier", path.display())]
    InvalidSymbol { symbol: String, path: PathBuf },

    #[error("'{symbol}' (from {}) collides with {other}", path.display())]
    SymbolClash {
        symbol: String,
        path: PathBuf,
        other: String,
    },

    #[error("Failed to parse config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Failed to render header: {0}")]
    Render(#[from] std::fmt::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
