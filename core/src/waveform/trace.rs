use serde::{Deserialize, Serialize};

/// The five named deflections of one cardiac cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveComponent {
    P,
    Q,
    R,
    S,
    T,
}

impl WaveComponent {
    pub fn label(&self) -> &'static str {
        match self {
            WaveComponent::P => "P",
            WaveComponent::Q => "Q",
            WaveComponent::R => "R",
            WaveComponent::S => "S",
            WaveComponent::T => "T",
        }
    }
}

/// Sample range occupied by one deflection of one beat.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WaveWindow {
    pub component: WaveComponent,
    pub start_sample: usize,
    pub end_sample: usize,
}

impl WaveWindow {
    pub fn start_seconds(&self, sampling_rate_hz: f64) -> f64 {
        self.start_sample as f64 / sampling_rate_hz
    }

    pub fn end_seconds(&self, sampling_rate_hz: f64) -> f64 {
        self.end_sample as f64 / sampling_rate_hz
    }
}

/// One synthesized trace: time axis, amplitudes, and the labelled windows.
/// Owned by the caller and replaced wholesale on every generate request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EkgTrace {
    pub time_axis: Vec<f64>,
    pub amplitude: Vec<f64>,
    pub wave_windows: Vec<WaveWindow>,
}

impl EkgTrace {
    pub fn len(&self) -> usize {
        self.amplitude.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amplitude.is_empty()
    }

    /// Seconds covered by the trimmed trace.
    pub fn duration_seconds(&self) -> f64 {
        self.time_axis.last().copied().unwrap_or(0.0)
    }

    pub fn windows_for(&self, component: WaveComponent) -> impl Iterator<Item = &WaveWindow> {
        self.wave_windows
            .iter()
            .filter(move |window| window.component == component)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trace() -> EkgTrace {
        EkgTrace {
            time_axis: vec![0.0, 0.001, 0.002],
            amplitude: vec![0.0, 1.0, 0.0],
            wave_windows: vec![
                WaveWindow {
                    component: WaveComponent::P,
                    start_sample: 0,
                    end_sample: 1,
                },
                WaveWindow {
                    component: WaveComponent::R,
                    start_sample: 1,
                    end_sample: 2,
                },
            ],
        }
    }

    #[test]
    fn windows_filter_by_component() {
        let trace = sample_trace();
        assert_eq!(trace.windows_for(WaveComponent::R).count(), 1);
        assert_eq!(trace.windows_for(WaveComponent::T).count(), 0);
    }

    #[test]
    fn window_bounds_convert_to_seconds_by_rate() {
        let window = WaveWindow {
            component: WaveComponent::T,
            start_sample: 420,
            end_sample: 540,
        };
        assert!((window.start_seconds(1000.0) - 0.42).abs() < 1e-12);
        assert!((window.end_seconds(1000.0) - 0.54).abs() < 1e-12);
    }

    #[test]
    fn trace_serializes_components_as_letters() {
        let trace = sample_trace();
        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["wave_windows"][0]["component"], "P");
        assert_eq!(json["wave_windows"][1]["start_sample"], 1);
        assert_eq!(json["amplitude"][1], 1.0);
    }
}
