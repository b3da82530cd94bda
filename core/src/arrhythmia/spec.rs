use serde::{Deserialize, Serialize};

/// Immutable description of one rhythm: the rate plus the morphology flags
/// the synthesizer understands. Absent fields deserialize to the inert
/// defaults, so a minimal entry only needs a heart rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrhythmiaSpec {
    /// Beats per minute; must be positive.
    pub heart_rate: f64,
    /// Whether a P deflection is synthesized at all.
    pub has_p_wave: bool,
    /// Flip the polarity of the P deflection at its original site.
    pub p_wave_inverted: bool,
    /// Move the P deflection to just after the R deflection.
    pub p_wave_retrograde: bool,
    /// Perturb beat-to-beat spacing by a uniform factor in [0.8, 1.2).
    pub rr_interval_variable: bool,
    /// Extra sawtooth pulses per beat for atrial flutter.
    pub flutter_ratio: Option<u32>,
    /// Shown to the learner after grading; also sent to the grading
    /// service as the rhythm's attributes.
    pub description: String,
}

impl Default for ArrhythmiaSpec {
    fn default() -> Self {
        Self {
            heart_rate: 60.0,
            has_p_wave: true,
            p_wave_inverted: false,
            p_wave_retrograde: false,
            rr_interval_variable: false,
            flutter_ratio: None,
            description: String::new(),
        }
    }
}

impl ArrhythmiaSpec {
    /// Seconds from one beat onset to the next at this rate.
    pub fn beat_duration_seconds(&self) -> f64 {
        60.0 / self.heart_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_deserialize_to_inert_defaults() {
        let spec: ArrhythmiaSpec =
            serde_json::from_str(r#"{"heart_rate": 150.0, "has_p_wave": false}"#).unwrap();
        assert_eq!(spec.heart_rate, 150.0);
        assert!(!spec.has_p_wave);
        assert!(!spec.p_wave_inverted);
        assert!(!spec.p_wave_retrograde);
        assert!(!spec.rr_interval_variable);
        assert_eq!(spec.flutter_ratio, None);
        assert!(spec.description.is_empty());
    }

    #[test]
    fn beat_duration_follows_heart_rate() {
        let spec = ArrhythmiaSpec {
            heart_rate: 100.0,
            ..Default::default()
        };
        assert!((spec.beat_duration_seconds() - 0.6).abs() < 1e-12);
    }
}
