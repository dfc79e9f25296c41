//! Metrics collection and export module

use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};
use std::time::Instant;

/// Global metrics registry
pub struct Metrics {
    registry: Registry,

    // Counters
    pub actions_total: IntCounter,
    pub actions_success: IntCounter,
    pub actions_failed: IntCounter,
    pub action_failures: IntCounterVec,
    pub accounts_created: IntCounter,

    // Histograms
    pub rpc_latency: Histogram,
    pub action_latency: Histogram,
}

impl Metrics {
    /// Create new metrics instance
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let actions_total = IntCounter::with_opts(Opts::new(
            "token_actions_total",
            "Total number of actions started",
        ))?;

        let actions_success = IntCounter::with_opts(Opts::new(
            "token_actions_success",
            "Number of actions that completed successfully",
        ))?;

        let actions_failed = IntCounter::with_opts(Opts::new(
            "token_actions_failed",
            "Number of actions that failed",
        ))?;

        let action_failures = IntCounterVec::new(
            Opts::new(
                "token_action_failures",
                "Action failures by error category",
            ),
            &["category"],
        )?;

        let accounts_created = IntCounter::with_opts(Opts::new(
            "token_accounts_created",
            "Token accounts submitted for creation",
        ))?;

        let rpc_latency = Histogram::with_opts(
            HistogramOpts::new("rpc_latency_seconds", "RPC call latency")
                .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        )?;

        let action_latency = Histogram::with_opts(
            HistogramOpts::new("action_latency_seconds", "End-to-end action latency")
                .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        )?;

        // Register all metrics
        registry.register(Box::new(actions_total.clone()))?;
        registry.register(Box::new(actions_success.clone()))?;
        registry.register(Box::new(actions_failed.clone()))?;
        registry.register(Box::new(action_failures.clone()))?;
        registry.register(Box::new(accounts_created.clone()))?;
        registry.register(Box::new(rpc_latency.clone()))?;
        registry.register(Box::new(action_latency.clone()))?;

        Ok(Self {
            registry,
            actions_total,
            actions_success,
            actions_failed,
            action_failures,
            accounts_created,
            rpc_latency,
            action_latency,
        })
    }

    /// Get the registry for exporting
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record the end of an action
    pub fn record_outcome(&self, failure_category: Option<&str>) {
        match failure_category {
            None => self.actions_success.inc(),
            Some(category) => {
                self.actions_failed.inc();
                self.action_failures.with_label_values(&[category]).inc();
            }
        }
    }
}

/// Global metrics instance
pub fn metrics() -> &'static Metrics {
    static METRICS: once_cell::sync::Lazy<Metrics> =
        once_cell::sync::Lazy::new(|| Metrics::new().expect("Failed to initialize metrics"));
    &METRICS
}

/// Timer helper for measuring operation duration
pub struct Timer {
    start: Instant,
    histogram_name: &'static str,
}

impl Timer {
    /// Create a timer recording into the named histogram on `finish`
    pub fn with_name(histogram_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            histogram_name,
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// Finish the timer and record to the associated histogram
    pub fn finish(self) {
        let duration = self.start.elapsed().as_secs_f64();
        match self.histogram_name {
            "rpc_latency_seconds" => metrics().rpc_latency.observe(duration),
            "action_latency_seconds" => metrics().action_latency.observe(duration),
            name => tracing::debug!("Unknown histogram name: {}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_outcome_counts_by_category() {
        let m = Metrics::new().unwrap();

        m.record_outcome(None);
        m.record_outcome(Some("validation"));
        m.record_outcome(Some("validation"));
        m.record_outcome(Some("rpc"));

        assert_eq!(m.actions_success.get(), 1);
        assert_eq!(m.actions_failed.get(), 3);
        assert_eq!(m.action_failures.with_label_values(&["validation"]).get(), 2);
        assert_eq!(m.action_failures.with_label_values(&["rpc"]).get(), 1);
    }

    #[test]
    fn test_registry_exports_all_families() {
        let m = Metrics::new().unwrap();
        m.action_failures.with_label_values(&["signing"]).inc();
        assert_eq!(m.registry().gather().len(), 7);
    }

    #[test]
    fn test_timer_records_histogram() {
        let before = metrics().action_latency.get_sample_count();
        Timer::with_name("action_latency_seconds").finish();
        assert!(metrics().action_latency.get_sample_count() > before);
    }
}
