use std::path::PathBuf;

use lyon::tessellation::TessellationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GerberError {
    #[error("IO error writing '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Write(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Unsupported path command '{0}'")]
    UnsupportedPathCommand(char),

    #[error("Malformed parameters for path command '{command}', expected groups of {arity}, got {count}")]
    MalformedPathStep {
        command: char,
        arity: usize,
        count: usize,
    },

    #[error("Invalid polarity mark '{0}', expected 'd' or 'c'")]
    InvalidPolarity(char),

    #[error("Unknown font '{0}'")]
    UnknownFont(String),

    #[error("Tessellation failed: {0:?}")]
    Tessellation(TessellationError),

    #[cfg(feature = "serde")]
    #[error("Font data error: {0}")]
    FontData(#[from] serde_json::Error),
}

impl From<TessellationError> for GerberError {
    fn from(value: TessellationError) -> Self {
        GerberError::Tessellation(value)
    }
}
