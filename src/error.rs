//! Crate error type
//!
//! Nothing here is fatal: adapters log these and leave the simulation untouched.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A color string that is neither hex nor a known CSS name
    #[error("invalid color {0:?}")]
    InvalidColor(String),

    /// A slider or form value that is not a number
    #[error("invalid value {value:?} for control {control}")]
    InvalidControlValue { control: String, value: String },

    /// Malformed settings or replay document
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
