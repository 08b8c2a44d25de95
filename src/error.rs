use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Request-level errors surfaced to HTTP clients
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("La película '{title}' no se encuentra en la base de datos.")]
    NotFound { title: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        };

        let body = Json(json!({
            "detail": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Errors that prevent the service from starting
#[derive(thiserror::Error, Debug)]
pub enum StartupError {
    #[error("Failed to open dataset {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Malformed dataset at line {line}: {source}")]
    Csv {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Dataset declares column '{0}' more than once")]
    DuplicateColumn(String),

    #[error("Dataset has column '{0}' outside the configured feature set")]
    UnexpectedColumn(String),

    #[error("Dataset has no feature columns")]
    NoFeatureColumns,

    #[error("Invalid value '{value}' in column '{column}' at line {line}")]
    InvalidValue {
        line: u64,
        column: String,
        value: String,
    },

    #[error("Dataset contains no records")]
    Empty,

    #[error("Cannot locate the running executable: {0}")]
    ExecutableLocation(#[from] std::io::Error),
}
