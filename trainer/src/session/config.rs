use anyhow::Context;
use ekgcore::prelude::SynthesisParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Endpoint the grading client posts diagnoses to when none is configured.
pub const DEFAULT_GRADER_URL: &str = "http://127.0.0.1:8000/analyze-response";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub duration_seconds: f64,
    pub sampling_rate_hz: f64,
    pub beats: usize,
    pub noise_amplitude: f64,
    /// Seed for the drill sequence; omit to draw from OS entropy.
    pub seed: Option<u64>,
    pub grader_url: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_seconds: 5.0,
            sampling_rate_hz: 1000.0,
            beats: 3,
            noise_amplitude: 0.05,
            seed: None,
            grader_url: DEFAULT_GRADER_URL.to_string(),
        }
    }
}

impl SessionConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading session config {}", path_ref.display()))?;
        let config: SessionConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing session config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        beats: usize,
        duration_seconds: f64,
        sampling_rate_hz: f64,
        seed: Option<u64>,
        grader_url: Option<String>,
    ) -> Self {
        Self {
            beats,
            duration_seconds,
            sampling_rate_hz,
            seed,
            grader_url: grader_url.unwrap_or_else(|| DEFAULT_GRADER_URL.to_string()),
            ..Self::default()
        }
    }

    /// Parameters for one trace; the seed varies per drill, the rest is fixed
    /// for the session.
    pub fn to_synthesis_params(&self, seed: u64) -> SynthesisParams {
        SynthesisParams {
            duration_seconds: self.duration_seconds,
            sampling_rate_hz: self.sampling_rate_hz,
            beat_count: self.beats,
            noise_amplitude: self.noise_amplitude,
            seed,
        }
    }
}
