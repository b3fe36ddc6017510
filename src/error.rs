use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Fatal errors raised while loading the catalog and similarity artifacts.
///
/// The service must not start serving when any of these occur.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed artifact {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("similarity matrix has {rows} rows but the catalog has {expected} movies")]
    DimensionMismatch { expected: usize, rows: usize },

    #[error("similarity row {row} has {len} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("similarity blob is {bytes} bytes, expected {expected} for {movies} movies")]
    BlobSize {
        bytes: usize,
        expected: usize,
        movies: usize,
    },

    #[error("similarity matrix has {cells} scores, expected {expected}")]
    CellCount { cells: usize, expected: usize },

    #[error("non-finite similarity score at ({row}, {col})")]
    NonFinite { row: usize, col: usize },
}
