use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Shared knobs for every synthesis request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisParams {
    pub duration_seconds: f64,
    pub sampling_rate_hz: f64,
    pub beat_count: usize,
    pub noise_amplitude: f64,
    pub seed: u64,
}

impl Default for SynthesisParams {
    fn default() -> Self {
        Self {
            duration_seconds: 5.0,
            sampling_rate_hz: 1000.0,
            beat_count: 3,
            noise_amplitude: 0.05,
            seed: 0,
        }
    }
}

impl SynthesisParams {
    /// Seeded generator driving every random term of one synthesis run.
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }

    /// Checked before any buffer allocation.
    pub fn validate(&self) -> EkgResult<()> {
        if !self.duration_seconds.is_finite() || self.duration_seconds <= 0.0 {
            return Err(EkgError::InvalidSynthesisParameters(format!(
                "duration_seconds must be positive, got {}",
                self.duration_seconds
            )));
        }
        if !self.sampling_rate_hz.is_finite() || self.sampling_rate_hz <= 0.0 {
            return Err(EkgError::InvalidSynthesisParameters(format!(
                "sampling_rate_hz must be positive, got {}",
                self.sampling_rate_hz
            )));
        }
        if self.beat_count == 0 {
            return Err(EkgError::InvalidSynthesisParameters(
                "beat_count must be at least 1".into(),
            ));
        }
        if !self.noise_amplitude.is_finite() || self.noise_amplitude < 0.0 {
            return Err(EkgError::InvalidSynthesisParameters(format!(
                "noise_amplitude must be non-negative, got {}",
                self.noise_amplitude
            )));
        }
        Ok(())
    }
}

/// Common error type for catalog lookups and synthesis.
#[derive(thiserror::Error, Debug)]
pub enum EkgError {
    #[error("unknown arrhythmia: {0}")]
    UnknownArrhythmia(String),
    #[error("invalid synthesis parameters: {0}")]
    InvalidSynthesisParameters(String),
}

pub type EkgResult<T> = Result<T, EkgError>;
