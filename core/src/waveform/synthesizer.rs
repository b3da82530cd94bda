use ndarray::Array1;
use rand::Rng;

use crate::arrhythmia::spec::ArrhythmiaSpec;
use crate::math::pulse::PulseHelper;
use crate::math::stats::StatsHelper;
use crate::prelude::{EkgError, EkgResult, SynthesisParams};
use crate::telemetry::log::LogManager;
use crate::waveform::trace::{EkgTrace, WaveComponent, WaveWindow};

/// Fractional offsets of the deflections within one beat.
const P_OFFSET: f64 = 0.20;
const Q_OFFSET: f64 = 0.40;
const R_OFFSET: f64 = 0.45;
const S_OFFSET: f64 = 0.50;
const T_OFFSET: f64 = 0.70;

/// A retrograde P sits this far behind the R deflection, as a beat fraction.
const RETROGRADE_SHIFT: f64 = 0.10;

/// Deterministic EKG synthesizer. One instance serves any number of
/// requests; every random term of a run comes from the per-call generator,
/// so identical inputs reproduce identical traces.
pub struct WaveformSynthesizer {
    logger: LogManager,
}

impl WaveformSynthesizer {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new(),
        }
    }

    /// Synthesize with the seeded generator described by `params`.
    pub fn synthesize(
        &self,
        spec: &ArrhythmiaSpec,
        params: &SynthesisParams,
    ) -> EkgResult<EkgTrace> {
        let mut rng = params.rng();
        self.synthesize_with_rng(spec, params, &mut rng)
    }

    /// Synthesize drawing every random term (R-R spacing and baseline
    /// noise) from `rng`.
    pub fn synthesize_with_rng<R: Rng>(
        &self,
        spec: &ArrhythmiaSpec,
        params: &SynthesisParams,
        rng: &mut R,
    ) -> EkgResult<EkgTrace> {
        params.validate()?;
        if !spec.heart_rate.is_finite() || spec.heart_rate <= 0.0 {
            return Err(EkgError::InvalidSynthesisParameters(format!(
                "heart_rate must be positive, got {}",
                spec.heart_rate
            )));
        }

        let rate = params.sampling_rate_hz;
        let total_samples = (params.duration_seconds * rate).floor() as usize;
        let beat_duration = spec.beat_duration_seconds();
        let beat_samples = (beat_duration * rate).floor() as usize;

        let time_axis = Array1::from_shape_fn(total_samples, |i| i as f64 / rate);
        let mut amplitude = Array1::<f64>::zeros(total_samples);
        let mut windows: Vec<WaveWindow> = Vec::with_capacity(params.beat_count * 5);

        // Sum of the per-beat spacing factors; exactly `k` beats while the
        // R-R interval is regular.
        let mut elapsed_beats = 0.0_f64;
        for _ in 0..params.beat_count {
            let start = (elapsed_beats * beat_duration * rate).floor() as usize;
            if start < total_samples {
                let end = (start + beat_samples).min(total_samples);
                self.write_beat(spec, params, rng, start, end, &mut amplitude);
                windows.extend(beat_windows(spec, start, beat_duration, rate));
            }

            elapsed_beats += if spec.rr_interval_variable {
                rng.gen_range(0.8..1.2)
            } else {
                1.0
            };
        }

        let trimmed_end = (params.beat_count as f64 * beat_duration * rate).ceil() as usize;
        let length = trimmed_end.min(total_samples);

        let mut wave_windows = Vec::with_capacity(windows.len());
        for mut window in windows {
            if window.start_sample >= length {
                continue;
            }
            window.end_sample = window.end_sample.min(length);
            wave_windows.push(window);
        }

        let amplitude: Vec<f64> = amplitude.iter().take(length).copied().collect();
        let time_axis: Vec<f64> = time_axis.iter().take(length).copied().collect();

        self.logger.record(&format!(
            "synthesized {} samples, {} wave windows, rms {:.4}",
            amplitude.len(),
            wave_windows.len(),
            StatsHelper::rms(&amplitude)
        ));

        Ok(EkgTrace {
            time_axis,
            amplitude,
            wave_windows,
        })
    }

    /// One beat's deflections plus baseline noise, overwriting
    /// `amplitude[start..end]`.
    fn write_beat<R: Rng>(
        &self,
        spec: &ArrhythmiaSpec,
        params: &SynthesisParams,
        rng: &mut R,
        start: usize,
        end: usize,
        amplitude: &mut Array1<f64>,
    ) {
        let beat_duration = spec.beat_duration_seconds();
        let rate = params.sampling_rate_hz;
        let p_center = if spec.p_wave_retrograde {
            (R_OFFSET + RETROGRADE_SHIFT) * beat_duration
        } else {
            P_OFFSET * beat_duration
        };

        for index in start..end {
            let x = (index - start) as f64 / rate;
            let mut value = 0.0;

            if spec.has_p_wave {
                value += PulseHelper::gaussian(x, p_center, 0.1, 0.05 * beat_duration);
                if spec.p_wave_inverted {
                    value -= PulseHelper::gaussian(
                        x,
                        P_OFFSET * beat_duration,
                        0.1,
                        0.05 * beat_duration,
                    );
                }
                if let Some(ratio) = spec.flutter_ratio {
                    value += flutter_pulses(x, ratio, beat_duration);
                }
            }

            value -= PulseHelper::gaussian(x, Q_OFFSET * beat_duration, 0.15, 0.02 * beat_duration);
            value += PulseHelper::gaussian(x, R_OFFSET * beat_duration, 1.0, 0.01 * beat_duration);
            value -= PulseHelper::gaussian(x, S_OFFSET * beat_duration, 0.2, 0.02 * beat_duration);
            value += PulseHelper::gaussian(x, T_OFFSET * beat_duration, 0.3, 0.1 * beat_duration);

            if params.noise_amplitude > 0.0 {
                value += params.noise_amplitude * (rng.gen::<f64>() - 0.5);
            }

            amplitude[index] = value;
        }
    }
}

impl Default for WaveformSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Sawtooth flutter: `ratio` extra pulses spread evenly across the span
/// before the QRS onset.
fn flutter_pulses(x: f64, ratio: u32, beat_duration: f64) -> f64 {
    let q_seconds = Q_OFFSET * beat_duration;
    let mut sum = 0.0;
    for i in 0..ratio {
        let center = (i + 1) as f64 / (ratio + 1) as f64 * q_seconds;
        sum += PulseHelper::gaussian(x, center, 0.1, 0.05 * beat_duration);
    }
    sum
}

/// Highlight windows for one beat, in P-Q-R-S-T order. The P window stays
/// at the canonical site even when the P pulse itself is retrograde.
fn beat_windows(
    spec: &ArrhythmiaSpec,
    start: usize,
    beat_duration: f64,
    rate: f64,
) -> Vec<WaveWindow> {
    let bounds = |offset: f64, width: f64| {
        let offset_seconds = offset * beat_duration;
        let from = start + (offset_seconds * rate).floor() as usize;
        let to = start + ((offset_seconds + width * beat_duration) * rate).floor() as usize;
        (from, to)
    };

    let mut windows = Vec::with_capacity(5);
    if spec.has_p_wave {
        let (from, to) = bounds(P_OFFSET, 0.10);
        windows.push(WaveWindow {
            component: WaveComponent::P,
            start_sample: from,
            end_sample: to,
        });
    }
    for (component, offset, width) in [
        (WaveComponent::Q, Q_OFFSET, 0.10),
        (WaveComponent::R, R_OFFSET, 0.10),
        (WaveComponent::S, S_OFFSET, 0.10),
        (WaveComponent::T, T_OFFSET, 0.20),
    ] {
        let (from, to) = bounds(offset, width);
        windows.push(WaveWindow {
            component,
            start_sample: from,
            end_sample: to,
        });
    }
    windows
}
