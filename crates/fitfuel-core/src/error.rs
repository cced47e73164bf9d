//! Error types for the fitfuel system.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("landmark buffer length mismatch: expected {expected} values, got {actual}")]
    LandmarkCount { expected: usize, actual: usize },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
