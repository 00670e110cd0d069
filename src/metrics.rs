//! Prometheus metrics collection for actionloop
//!
//! This module provides metrics instrumentation for tracking:
//! - Activations by action and outcome
//! - Activation latency by action
//!
//! Metrics are exposed via the `/metrics` endpoint in Prometheus text format.

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Activation outcome for type-safe metrics labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The action returned a `body`
    Body,
    /// The action returned an `error`
    Error,
}

impl Outcome {
    /// Convert outcome to Prometheus label string
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Body => "body",
            Outcome::Error => "error",
        }
    }
}

impl From<&crate::response::ActionResponse> for Outcome {
    fn from(response: &crate::response::ActionResponse) -> Self {
        if response.is_error() {
            Outcome::Error
        } else {
            Outcome::Body
        }
    }
}

/// Metrics collector for actionloop
///
/// Cloning is cheap; clones share the same registry.
#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
    invocations_total: IntCounterVec,
    invocation_duration: HistogramVec,
}

impl Metrics {
    /// Create a new Metrics instance
    ///
    /// # Errors
    ///
    /// Returns an error if metric registration fails (e.g., duplicate names).
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Cardinality: registered actions × 2 outcomes
        let invocations_total = IntCounterVec::new(
            Opts::new(
                "actionloop_invocations_total",
                "Total number of action activations by action and outcome",
            ),
            &["action", "outcome"],
        )?;

        let invocation_duration = HistogramVec::new(
            HistogramOpts::new(
                "actionloop_invocation_duration_ms",
                "Action activation latency in milliseconds",
            )
            .buckets(vec![
                1.0, 5.0, 10.0, 50.0, 100.0, 500.0, 1000.0, 5000.0, 30000.0,
            ]),
            &["action"],
        )?;

        registry.register(Box::new(invocations_total.clone()))?;
        registry.register(Box::new(invocation_duration.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            invocations_total,
            invocation_duration,
        })
    }

    /// Record one activation
    ///
    /// # Errors
    ///
    /// Returns an error if the metric is not registered or if `duration_ms`
    /// is NaN, infinite, or negative.
    pub fn record_invocation(
        &self,
        action: &str,
        outcome: Outcome,
        duration_ms: f64,
    ) -> Result<(), prometheus::Error> {
        if !duration_ms.is_finite() || duration_ms < 0.0 {
            return Err(prometheus::Error::Msg(format!(
                "Histogram value must be finite and non-negative, got: {}",
                duration_ms
            )));
        }

        self.invocations_total
            .get_metric_with_label_values(&[action, outcome.as_str()])?
            .inc();
        self.invocation_duration
            .get_metric_with_label_values(&[action])?
            .observe(duration_ms);
        Ok(())
    }

    /// Number of activations recorded for `action` with `outcome`
    pub fn invocation_count(&self, action: &str, outcome: Outcome) -> u64 {
        self.invocations_total
            .get_metric_with_label_values(&[action, outcome.as_str()])
            .map(|counter| counter.get())
            .unwrap_or(0)
    }

    /// Encode all metrics in Prometheus text format
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    metric_family_count = metric_families.len(),
                    "Prometheus text encoder failed"
                );
                e
            })?;

        String::from_utf8(buffer).map_err(|e| {
            prometheus::Error::Msg(format!("Metrics output is not valid UTF-8: {}", e))
        })
    }
}
