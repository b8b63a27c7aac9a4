//! Typed errors for the parse and config edges.
//!
//! The store and stats modules never fail; only turning caller text into
//! typed values can.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeskError {
    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("invalid time '{0}' (expected HH:MM)")]
    InvalidTime(String),

    #[error("invalid timestamp '{0}'")]
    InvalidDateTime(String),

    #[error("unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DeskError>;
