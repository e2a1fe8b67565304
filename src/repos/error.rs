/*
 * Responsibility
 * - What a store tells the layers above it (not found / conflict)
 */
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{resource} not found")]
    NotFound { resource: &'static str },
    #[error("{resource} already exists: {name}")]
    Conflict { resource: &'static str, name: String },
}

impl StoreError {
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }
}
