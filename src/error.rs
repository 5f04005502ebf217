use thiserror::Error;

/// Errors raised while assembling a run, before any registry call is made.
#[derive(Error, Debug)]
pub enum Error {
    #[error("branch name has no letters or digits; refusing to match versions against it")]
    EmptyBranch,

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}

/// Failures talking to the package registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("registry returned status {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("GraphQL error: {0}")]
    Graphql(String),

    #[error("package `{0}` was not found")]
    PackageNotFound(String),

    #[error("`{0}` cannot be used as a base URL")]
    InvalidBaseUrl(String),
}

pub type Result<T> = std::result::Result<T, Error>;
