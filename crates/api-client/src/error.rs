use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to build the HTTP client: {0}")]
    RequestBuild(#[from] reqwest::Error),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid page request: {0}")]
    InvalidPage(#[from] CoreError),
}
