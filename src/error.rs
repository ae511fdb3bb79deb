use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WharfError {
    #[error("Key not found")]
    KeyNotFound,

    #[error(
        "Invalid key size: key must be at most {} bytes",
        crate::constants::MAX_KEY_SIZE
    )]
    InvalidKeySize,

    #[error("Encoding failed: {0}")]
    EncodeFailed(#[source] bincode::Error),

    #[error("Decoding failed: {0}")]
    DecodeFailed(#[source] bincode::Error),

    #[error("Invalid path: a persistent store needs a non-empty path")]
    InvalidPath,

    #[error("Store is closed")]
    StoreClosed,

    #[error("Store is full: offset exceeds the addressable file range")]
    StoreFull,

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, WharfError>;
