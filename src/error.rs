//! Error types for generation, configuration and export.

use std::io;

use thiserror::Error;

/// Failures that abort a generation run.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("human players must be in 1..=8, got {0}")]
    HumanPlayers(usize),

    #[error("total players must not exceed 8 (humans {humans} + ai {ai})")]
    TotalPlayers { humans: usize, ai: usize },

    #[error("invalid {what} range {min}..={max}")]
    InvalidRange {
        what: &'static str,
        min: usize,
        max: usize,
    },

    #[error("balanced main area of {main_size} regions cannot be split over {players} players")]
    EmptyFragment { main_size: usize, players: usize },

    #[error("starting-area template did not produce a start region")]
    MissingStartTemplate,

    #[error("generated world is malformed: {0}")]
    Malformed(String),
}

/// Failures while loading or interpreting configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Failures while writing generated output.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type GenerationResult<T> = Result<T, GenerationError>;
