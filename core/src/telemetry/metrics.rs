use std::sync::Mutex;

use serde::Serialize;

/// Session counters surfaced by the offline summary and the bridge's
/// status route.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

struct Metrics {
    traces_generated: usize,
    gradings_failed: usize,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub traces_generated: usize,
    pub gradings_failed: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics {
                traces_generated: 0,
                gradings_failed: 0,
            }),
        }
    }

    pub fn record_trace(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.traces_generated += 1;
        }
    }

    pub fn record_grading_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.gradings_failed += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            MetricsSnapshot {
                traces_generated: metrics.traces_generated,
                gradings_failed: metrics.gradings_failed,
            }
        } else {
            MetricsSnapshot {
                traces_generated: 0,
                gradings_failed: 0,
            }
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
