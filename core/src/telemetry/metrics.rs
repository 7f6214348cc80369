use std::sync::Mutex;

pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

struct Metrics {
    aggregations: usize,
    adapter_failures: usize,
    degraded_runs: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics {
                aggregations: 0,
                adapter_failures: 0,
                degraded_runs: 0,
            }),
        }
    }

    pub fn record_aggregation(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.aggregations += 1;
        }
    }

    pub fn record_adapter_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.adapter_failures += 1;
        }
    }

    pub fn record_degraded_run(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.degraded_runs += 1;
        }
    }

    /// (aggregations, adapter_failures, degraded_runs)
    pub fn snapshot(&self) -> (usize, usize, usize) {
        if let Ok(metrics) = self.inner.lock() {
            (
                metrics.aggregations,
                metrics.adapter_failures,
                metrics.degraded_runs,
            )
        } else {
            (0, 0, 0)
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
