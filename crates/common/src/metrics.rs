//! Metrics collection for ToyStand
//!
//! This module provides Prometheus metrics for observability.

use lazy_static::lazy_static;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry};
use std::sync::Arc;

/// Metrics registry for ToyStand
#[derive(Debug, Clone)]
pub struct MetricsRegistry {
    pub registry: Arc<Registry>,
    pub deployment: DeploymentMetrics,
    pub gateway: GatewayMetrics,
}

/// Per-deployment request metrics, labelled by deployment name
#[derive(Debug, Clone)]
pub struct DeploymentMetrics {
    /// Total number of requests handled
    pub requests_total: IntCounterVec,

    /// Requests answered with an error record
    pub requests_failed: IntCounterVec,

    /// Request duration histogram
    pub request_duration: HistogramVec,
}

/// Gateway-level metrics
#[derive(Debug, Clone)]
pub struct GatewayMetrics {
    /// Requests currently in flight
    pub active_requests: IntGauge,

    /// Deployments currently registered
    pub registered_deployments: IntGauge,
}

lazy_static! {
    /// Global metrics registry instance
    pub static ref METRICS: MetricsRegistry = MetricsRegistry::new();
}

impl MetricsRegistry {
    /// Create a new metrics registry
    pub fn new() -> Self {
        let registry = Arc::new(Registry::new());

        let requests_total = IntCounterVec::new(
            Opts::new("deployment_requests_total", "Total number of deployment requests"),
            &["deployment"],
        ).unwrap();

        let requests_failed = IntCounterVec::new(
            Opts::new(
                "deployment_requests_failed_total",
                "Total number of deployment requests answered with an error record",
            ),
            &["deployment"],
        ).unwrap();

        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                "deployment_request_duration_seconds",
                "Deployment request duration in seconds"
            ).buckets(vec![0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1]),
            &["deployment"],
        ).unwrap();

        let active_requests = IntGauge::new(
            "gateway_active_requests",
            "Current number of in-flight gateway requests"
        ).unwrap();

        let registered_deployments = IntGauge::new(
            "gateway_registered_deployments",
            "Current number of registered deployments"
        ).unwrap();

        // Register all metrics
        registry.register(Box::new(requests_total.clone())).unwrap();
        registry.register(Box::new(requests_failed.clone())).unwrap();
        registry.register(Box::new(request_duration.clone())).unwrap();
        registry.register(Box::new(active_requests.clone())).unwrap();
        registry.register(Box::new(registered_deployments.clone())).unwrap();

        MetricsRegistry {
            registry,
            deployment: DeploymentMetrics {
                requests_total,
                requests_failed,
                request_duration,
            },
            gateway: GatewayMetrics {
                active_requests,
                registered_deployments,
            },
        }
    }

    /// Gather all metrics as text
    pub fn gather(&self) -> String {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if encoder.encode(&metric_families, &mut buffer).is_err() {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper trait for measuring latency
pub trait LatencyTimer {
    /// Observe the duration of a closure
    fn time<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R;
}

impl LatencyTimer for prometheus::Histogram {
    fn time<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = std::time::Instant::now();
        let result = f();
        self.observe(start.elapsed().as_secs_f64());
        result
    }
}
