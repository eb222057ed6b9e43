//! Crate-wide error type.
//!
//! Library stages return their own errors ([`ConfigError`], [`ReadsError`]);
//! [`PeakError`] unifies them with output I/O for the binary and other
//! callers that drive a whole run.

use crate::config::ConfigError;
use crate::reads::ReadsError;
use std::io;
use thiserror::Error;

/// Any failure of a complete peak-calling run.
#[derive(Error, Debug)]
pub enum PeakError {
    /// Invalid parameter or unknown chromosome; raised before any work.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Reads could not be opened, parsed or decoded.
    #[error(transparent)]
    Reads(#[from] ReadsError),

    /// Writing the peak file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for whole-run operations.
pub type Result<T> = std::result::Result<T, PeakError>;
