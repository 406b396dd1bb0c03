//! Error types for the diff engine.
//!
//! Mirrors the split used throughout: a generic [`Result`] backed by
//! `anyhow` for propagation, plus a concrete [`DiffError`] enum that
//! callers can downcast to when they need to match on a specific kind.

use thiserror::Error;

/// The generic result type threaded through the crate.
pub type GenericError = anyhow::Error;
pub type Result<T, E = GenericError> = anyhow::Result<T, E>;

#[derive(Debug, Error)]
pub enum DiffError {
    #[error("out of memory")]
    OutOfMemory,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl DiffError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid_input(what: impl Into<String>) -> Self {
        Self::InvalidInput(what.into())
    }
}

/// Downcast helpers analogous to the teacher's `BitErrorExt`.
pub trait DiffErrorExt {
    fn is_not_found(&self) -> bool;
}

impl DiffErrorExt for GenericError {
    fn is_not_found(&self) -> bool {
        matches!(self.downcast_ref::<DiffError>(), Some(DiffError::NotFound(_)))
    }
}
