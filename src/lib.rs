//! Organizer - local JSON document persistence for a personal organizer.
//!
//! This library provides the core functionality for the `org` CLI tool:
//! one JSON document per module (links, calendar, goals, steps, kanban board,
//! ideas canvas) under a data root, plus timestamped snapshot backups.

pub mod action_log;
pub mod backup;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod storage;

use std::path::PathBuf;


/// Library-level error type for organizer operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed document {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No data found to back up")]
    EmptyBackup,

    #[error("Config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for organizer operations.
pub type Result<T> = std::result::Result<T, Error>;
