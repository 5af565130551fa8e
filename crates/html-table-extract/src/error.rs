use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document is not valid {encoding} text")]
    Decode { encoding: &'static str },

    #[error("unknown character encoding label: {0}")]
    UnknownEncoding(String),
}
