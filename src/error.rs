//! Error types and handling for the climate query service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the climate query service
#[derive(Error, Debug)]
pub enum ClimateError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// SQLite query or connection errors
    #[error("Database error: {source}")]
    Database {
        #[from]
        source: rusqlite::Error,
    },

    /// The dataset file or one of its tables is absent
    #[error("Dataset not available at {}: {reason}", .path.display())]
    DatasetMissing { path: PathBuf, reason: String },

    /// A blocking query task panicked or was cancelled
    #[error("Query task failed: {source}")]
    Task {
        #[from]
        source: tokio::task::JoinError,
    },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl ClimateError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn dataset_missing<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        Self::DatasetMissing {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ClimateError::Config { .. } => {
                "Configuration error. Please check your config file and environment.".to_string()
            }
            ClimateError::Database { .. } | ClimateError::Task { .. } => {
                "The climate dataset could not be queried.".to_string()
            }
            ClimateError::DatasetMissing { .. } => {
                "The climate dataset is not available.".to_string()
            }
            ClimateError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            ClimateError::General { message } => message.clone(),
        }
    }
}

impl IntoResponse for ClimateError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        let body = Json(json!({ "error": self.user_message() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
