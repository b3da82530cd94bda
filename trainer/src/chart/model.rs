use ekgcore::waveform::{EkgTrace, WaveComponent};
use serde::{Deserialize, Serialize};

/// Chart-ready view of the current trace: seconds on the x axis, one
/// highlight box per wave window. Deliberately answer-free.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartModel {
    pub label: String,
    pub time_seconds: Vec<f64>,
    pub amplitude: Vec<f64>,
    pub highlights: Vec<HighlightBox>,
    pub y_min: f64,
    pub y_max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightBox {
    pub component: WaveComponent,
    pub x_min_seconds: f64,
    pub x_max_seconds: f64,
}

impl ChartModel {
    /// Empty chart with the fixed amplitude range the legacy UI used.
    pub fn empty() -> Self {
        Self {
            label: "EKG Signal".to_string(),
            time_seconds: Vec::new(),
            amplitude: Vec::new(),
            highlights: Vec::new(),
            y_min: -1.0,
            y_max: 1.0,
        }
    }

    pub fn from_trace(trace: &EkgTrace, sampling_rate_hz: f64) -> Self {
        let highlights = trace
            .wave_windows
            .iter()
            .map(|window| HighlightBox {
                component: window.component,
                x_min_seconds: window.start_seconds(sampling_rate_hz),
                x_max_seconds: window.end_seconds(sampling_rate_hz),
            })
            .collect();

        Self {
            highlights,
            time_seconds: trace.time_axis.clone(),
            amplitude: trace.amplitude.clone(),
            ..Self::empty()
        }
    }
}

impl Default for ChartModel {
    fn default() -> Self {
        Self::empty()
    }
}
