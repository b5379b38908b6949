// src/errors.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HotelbotError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("api error: {0}")]
    Api(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl HotelbotError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        HotelbotError::Config(msg.into())
    }

    pub fn api_error(msg: impl Into<String>) -> Self {
        HotelbotError::Api(msg.into())
    }
}

pub type HotelbotResult<T> = Result<T, HotelbotError>;
