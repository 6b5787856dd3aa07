// Error type for the grid builder, persistence and navigator.
//
// Only genuinely failed operations produce a `NavError`: unreadable files,
// malformed JSON, or a config that cannot drive a build. Ray misses, filter
// rejections, dangling neighbor ids and incomplete paths are ordinary
// outcomes and never surface here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, NavError>;
