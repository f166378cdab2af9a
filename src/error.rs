//! Error types for billing, speech, session and dispatch failures

use thiserror::Error;

use crate::types::Intent;

/// Failure reported by a billing context mutation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BillingError {
    /// No bill item matched the given id or name.
    #[error("{0} not found in bill")]
    ItemNotFound(String),

    /// The quantity label has no leading number.
    #[error("invalid quantity label: {0:?}")]
    InvalidQuantity(String),

    /// The rate is negative or not finite.
    #[error("invalid rate: {0}")]
    InvalidRate(f64),

    /// An invoice was requested for a bill with no items.
    #[error("add items to generate invoice")]
    EmptyBill,

    /// The backing store or UI layer refused the operation.
    #[error("billing backend unavailable: {0}")]
    Unavailable(String),
}

/// Failure reported by a text-to-speech backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("speech synthesis not supported")]
    Unsupported,

    #[error("speech synthesis error: {0}")]
    Engine(String),
}

/// Failure in the voice session lifecycle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("voice session has been disposed")]
    Disposed,

    #[error("speech recognition not supported")]
    Unsupported,

    #[error("speech recognition error: {0}")]
    Engine(String),
}

/// Why a recognized command did not produce its mutation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DispatchError {
    /// The intent matched but a field the mutation needs is absent.
    #[error("{intent} is missing entity `{field}`")]
    MissingEntity { intent: Intent, field: &'static str },

    #[error(transparent)]
    Billing(#[from] BillingError),
}

/// Failure loading voice settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse voice settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid voice settings: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}
