//! ToyStand wire types
//!
//! JSON shapes exchanged between callers and the gateway. Deployment
//! requests are a bare two-element array `[code, value]`; replies are
//! either a bare JSON value or an error record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// Deployment request/reply types

/// A decoded `[code, value]` request payload
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    /// Operation code or item name
    pub code: Value,

    /// Operand or quantity
    pub value: Value,
}

impl Payload {
    /// Split a decoded body into its two elements
    ///
    /// Returns `None` unless the body is an array of exactly two elements.
    pub fn from_value(body: &Value) -> Option<Self> {
        match body.as_array().map(Vec::as_slice) {
            Some([code, value]) => Some(Self {
                code: code.clone(),
                value: value.clone(),
            }),
            _ => None,
        }
    }

    /// The code as a string, if it is one
    pub fn code_str(&self) -> Option<&str> {
        self.code.as_str()
    }
}

/// Error record returned in place of a success value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub error: String,
}

/// Outcome of a single deployment call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    /// Error record: `{"error": "<message>"}`
    Error(ErrorRecord),

    /// Bare success value
    Value(Value),
}

impl Reply {
    /// Build an error reply
    pub fn error(message: impl Into<String>) -> Self {
        Reply::Error(ErrorRecord {
            error: message.into(),
        })
    }
}

// Listing types (OpenAI-style model list)

/// One registered deployment as reported by `/models`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCard {
    pub id: String,
    pub object: String,
    pub owned_by: String,
}

impl ModelCard {
    /// Card for a deployment route
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            object: "model".to_string(),
            owned_by: "toystand".to_string(),
        }
    }
}

/// List of registered deployments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelList {
    pub object: String,
    pub data: Vec<ModelCard>,
}

impl ModelList {
    pub fn new(data: Vec<ModelCard>) -> Self {
        Self {
            object: "list".to_string(),
            data,
        }
    }
}

// Health check

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub deployments: usize,
}
