use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("response is not wrapped in a setResponse(...) envelope")]
    Envelope,
    #[error("malformed sheet payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("sheet feed reported an error: {0}")]
    Feed(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config {path:?}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
