//! Error types for the graph_drive crate.

use thiserror::Error;

/// Errors that can occur when interacting with a Microsoft Graph drive.
#[derive(Error, Debug)]
pub enum DriveError {
    #[error("Invalid configuration: {0} is missing or empty")]
    InvalidConfiguration(&'static str),

    #[error("Invalid drive path: {0:?}")]
    InvalidPath(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Lookup of {path} failed ({status}): {message}")]
    Lookup {
        path: String,
        status: u16,
        message: String,
    },

    #[error("Write to {path} failed ({status}): {message}")]
    Write {
        path: String,
        status: u16,
        message: String,
    },

    #[error("Delete of {path} failed ({status}): {message}")]
    Delete {
        path: String,
        status: u16,
        message: String,
    },

    #[error("Move to {path} failed: {message}")]
    Move { path: String, message: String },

    #[error("Copy to {path} failed: {message}")]
    Copy { path: String, message: String },

    #[error("Download of {path} failed: {message}")]
    Download { path: String, message: String },

    #[error("Operation not supported by the Graph drive API: {0}")]
    Unsupported(&'static str),
}

/// Result type alias for DriveError.
pub type Result<T> = std::result::Result<T, DriveError>;
