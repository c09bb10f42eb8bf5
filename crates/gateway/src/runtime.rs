//! Serving runtime and deployment registry
//!
//! The runtime is started once per process; deployments can only be
//! registered and looked up after it has started.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use toystand_common::error::{Result, ToyStandError};
use toystand_common::METRICS;
use toystand_deployments::DeploymentHandle;
use tracing::{debug, info};

/// Registry of live deployments behind a route prefix
pub struct ServeRuntime {
    /// Set once the runtime has been initialized
    started: AtomicBool,

    /// Route prefix the deployments are mounted under
    route_prefix: String,

    /// Registered deployments, keyed by route
    deployments: Arc<RwLock<HashMap<String, DeploymentHandle>>>,
}

impl ServeRuntime {
    /// Create a runtime that has not been started yet
    pub fn new(route_prefix: impl Into<String>) -> Self {
        Self {
            started: AtomicBool::new(false),
            route_prefix: route_prefix.into(),
            deployments: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Start the runtime if it is not running yet
    ///
    /// Returns `true` if this call performed the initialization.
    pub fn ensure_started(&self) -> bool {
        if self.started.swap(true, Ordering::SeqCst) {
            info!("Serving runtime is already initialized");
            false
        } else {
            info!("Initializing serving runtime...");
            true
        }
    }

    /// Whether the runtime has been started
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub fn route_prefix(&self) -> &str {
        &self.route_prefix
    }

    fn require_started(&self) -> Result<()> {
        if self.is_started() {
            Ok(())
        } else {
            Err(ToyStandError::runtime_not_started(
                "call ensure_started() before deploying or routing",
            ))
        }
    }

    /// Register a deployment under its route
    pub async fn deploy(&self, handle: DeploymentHandle) -> Result<()> {
        self.require_started()?;
        let route = handle.route().to_string();

        let count = {
            let mut deployments = self.deployments.write().await;
            if deployments.contains_key(&route) {
                return Err(ToyStandError::duplicate_deployment(route));
            }
            info!("Deploying {} at {}/{}", handle.name(), self.route_prefix, route);
            deployments.insert(route, handle);
            deployments.len()
        };

        METRICS.gateway.registered_deployments.set(count as i64);
        Ok(())
    }

    /// Remove a deployment
    pub async fn undeploy(&self, route: &str) -> Result<()> {
        let count = {
            let mut deployments = self.deployments.write().await;
            if deployments.remove(route).is_none() {
                return Err(ToyStandError::deployment_not_found(route));
            }
            deployments.len()
        };

        METRICS.gateway.registered_deployments.set(count as i64);
        info!("Removed deployment: {}", route);
        Ok(())
    }

    /// Look up the deployment serving `route`
    pub async fn get(&self, route: &str) -> Result<DeploymentHandle> {
        self.require_started()?;

        let deployments = self.deployments.read().await;
        let handle = deployments
            .get(route)
            .cloned()
            .ok_or_else(|| ToyStandError::deployment_not_found(route))?;

        debug!("Routing request to {}", handle.name());
        Ok(handle)
    }

    /// Routes of all registered deployments, sorted
    pub async fn routes(&self) -> Vec<String> {
        let deployments = self.deployments.read().await;
        let mut routes: Vec<String> = deployments.keys().cloned().collect();
        routes.sort();
        routes
    }

    /// Number of registered deployments
    pub async fn deployment_count(&self) -> usize {
        self.deployments.read().await.len()
    }
}
