//! Deployment contract and request error boundary
//!
//! A [`Deployment`] is a pure function from a decoded request body to a
//! JSON value. [`DeploymentHandle`] wraps one and is the single place
//! where errors are logged and turned into `{"error": ...}` records.

use crate::number::NumberError;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use toystand_common::error::{Result, ToyStandError};
use toystand_common::metrics::LatencyTimer;
use toystand_common::METRICS;
use toystand_proto::Reply;
use tracing::{debug, error};
use uuid::Uuid;

/// A servable unit of business logic
pub trait Deployment: Send + Sync {
    /// Display name used in logs
    fn name(&self) -> &str;

    /// Path segment the deployment is served under
    fn route(&self) -> &str;

    /// Compute the reply for a decoded request body
    fn call(&self, body: &Value) -> Result<Value>;
}

impl From<NumberError> for ToyStandError {
    fn from(err: NumberError) -> Self {
        match err {
            NumberError::NotANumber(_) => ToyStandError::InvalidInput(err.to_string()),
            NumberError::Overflow(_) | NumberError::NotRepresentable(_) => {
                ToyStandError::Computation(err.to_string())
            }
        }
    }
}

/// Shareable handle around a deployment
#[derive(Clone)]
pub struct DeploymentHandle {
    inner: Arc<dyn Deployment>,
}

impl std::fmt::Debug for DeploymentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeploymentHandle")
            .field("name", &self.inner.name())
            .field("route", &self.inner.route())
            .finish()
    }
}

impl DeploymentHandle {
    /// Wrap a deployment
    pub fn new<D: Deployment + 'static>(deployment: D) -> Self {
        Self {
            inner: Arc::new(deployment),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn route(&self) -> &str {
        self.inner.route()
    }

    /// Handle a decoded request body
    ///
    /// Never fails: errors are logged and returned as an error record.
    pub fn handle(&self, body: &Value) -> Reply {
        self.observe(|| self.inner.call(body))
    }

    /// Handle a raw request body
    ///
    /// Bodies that are not valid JSON go through the same error boundary
    /// as payloads the deployment rejects.
    pub fn handle_bytes(&self, bytes: &[u8]) -> Reply {
        self.observe(|| {
            let body: Value = serde_json::from_slice(bytes)?;
            self.inner.call(&body)
        })
    }

    fn observe<F>(&self, f: F) -> Reply
    where
        F: FnOnce() -> Result<Value>,
    {
        let request_id = Uuid::new_v4();
        let route = self.inner.route();
        let start = Instant::now();

        METRICS.deployment.requests_total.with_label_values(&[route]).inc();
        let result = METRICS
            .deployment
            .request_duration
            .with_label_values(&[route])
            .time(f);

        match result {
            Ok(value) => {
                debug!(
                    %request_id,
                    deployment = self.inner.name(),
                    elapsed_us = start.elapsed().as_micros() as u64,
                    "Request completed"
                );
                Reply::Value(value)
            }
            Err(e) => {
                METRICS.deployment.requests_failed.with_label_values(&[route]).inc();
                error!(
                    %request_id,
                    deployment = self.inner.name(),
                    error = ?e,
                    "Error in {}: {}",
                    self.inner.name(),
                    e
                );
                Reply::error(e.to_string())
            }
        }
    }
}
