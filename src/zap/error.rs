#![forbid(unsafe_code)]

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZapError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid archive: {0}")]
    Invalid(String),

    #[error("unsupported compression id {0}")]
    Unsupported(u8),

    #[error("no such entry: {0}")]
    NotFound(String),

    #[error("entry has no stored payload: {0}")]
    Empty(String),

    #[error("codec: {0}")]
    Codec(String),

    #[error("path is outside input dir: {0}")]
    Outside(String),
}

pub type ZapResult<T> = Result<T, ZapError>;
