//! The module contains the errors the engine can throw.
//!
//! The variants map one-to-one onto the HTTP statuses the server
//! returns:
//!
//! - [`KeyNotFound`] when a referenced record does not exist.
//! - [`ExistingKey`] when a unique field (customer email) collides.
//! - [`InvalidInput`] for malformed or out-of-range caller data.
//! - [`InsufficientFunds`] when a wallet cannot cover a purchase.
//!
//! [`KeyNotFound`]: EngineError::KeyNotFound
//! [`ExistingKey`]: EngineError::ExistingKey
//! [`InvalidInput`]: EngineError::InvalidInput
//! [`InsufficientFunds`]: EngineError::InsufficientFunds
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Insufficient balance. Need {required_minor}, Have {available_minor}")]
    InsufficientFunds {
        required_minor: i64,
        available_minor: i64,
    },
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (
                Self::InsufficientFunds {
                    required_minor: ra,
                    available_minor: aa,
                },
                Self::InsufficientFunds {
                    required_minor: rb,
                    available_minor: ab,
                },
            ) => ra == rb && aa == ab,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
