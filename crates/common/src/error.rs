//! Common error types for ToyStand
//!
//! This module defines all error types used across the ToyStand system.
//! All errors map to an HTTP status code so the gateway can answer
//! consistently without knowing where an error originated.

use std::net::AddrParseError;
use thiserror::Error;

/// Main error type for ToyStand
#[derive(Error, Debug)]
pub enum ToyStandError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed request payload (wrong shape or wrong types)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Failure while computing a reply from a well-formed payload
    #[error("Computation error: {0}")]
    Computation(String),

    /// No deployment is registered under the requested route
    #[error("Deployment not found: {0}")]
    DeploymentNotFound(String),

    /// A deployment is already registered under the route
    #[error("Deployment already registered: {0}")]
    DuplicateDeployment(String),

    /// The serving runtime has not been started yet
    #[error("Serving runtime not started: {0}")]
    RuntimeNotStarted(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AddrParseError> for ToyStandError {
    fn from(err: AddrParseError) -> Self {
        ToyStandError::Parse(err.to_string())
    }
}

impl ToyStandError {
    /// HTTP status code for this error kind
    pub fn status_code(&self) -> u16 {
        match self {
            ToyStandError::InvalidInput(_)
            | ToyStandError::Serialization(_)
            | ToyStandError::Parse(_) => 400,
            ToyStandError::DeploymentNotFound(_) => 404,
            ToyStandError::DuplicateDeployment(_) => 409,
            ToyStandError::Computation(_) => 422,
            ToyStandError::RuntimeNotStarted(_) => 503,
            ToyStandError::Config(_) | ToyStandError::Io(_) | ToyStandError::Internal(_) => 500,
        }
    }

    /// Whether the error was caused by the caller's payload
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        ToyStandError::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        ToyStandError::InvalidInput(msg.into())
    }

    /// Create a computation error
    pub fn computation(msg: impl Into<String>) -> Self {
        ToyStandError::Computation(msg.into())
    }

    /// Create a deployment not found error
    pub fn deployment_not_found(msg: impl Into<String>) -> Self {
        ToyStandError::DeploymentNotFound(msg.into())
    }

    /// Create a duplicate deployment error
    pub fn duplicate_deployment(msg: impl Into<String>) -> Self {
        ToyStandError::DuplicateDeployment(msg.into())
    }

    /// Create a runtime not started error
    pub fn runtime_not_started(msg: impl Into<String>) -> Self {
        ToyStandError::RuntimeNotStarted(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        ToyStandError::Internal(msg.into())
    }
}

/// Result type alias for ToyStand operations
pub type Result<T> = std::result::Result<T, ToyStandError>;
