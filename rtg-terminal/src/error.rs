use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse scene config: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Invalid scene parameters: {0}")]
    Geometry(#[from] rtg_core::Error),
    #[error("Unknown scene '{0}' (expected camera, shapes or pond)")]
    UnknownScene(String),
}

pub type AppResult<T> = ::std::result::Result<T, AppError>;
