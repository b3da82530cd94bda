pub struct PulseHelper;

impl PulseHelper {
    /// Gaussian deflection: `amplitude * exp(-(x - mean)^2 / (2 * width^2))`.
    /// Every wave of the synthesized EKG is a sum of these.
    pub fn gaussian(x: f64, mean: f64, amplitude: f64, width: f64) -> f64 {
        let delta = x - mean;
        amplitude * (-(delta * delta) / (2.0 * width * width)).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gaussian_peaks_at_mean() {
        let peak = PulseHelper::gaussian(0.27, 0.27, 1.0, 0.006);
        assert!((peak - 1.0).abs() < 1e-12);
    }

    #[test]
    fn gaussian_is_symmetric_about_mean() {
        let left = PulseHelper::gaussian(0.25, 0.3, 0.5, 0.02);
        let right = PulseHelper::gaussian(0.35, 0.3, 0.5, 0.02);
        assert!((left - right).abs() < 1e-12);
        assert!(left < 0.5);
    }

    #[test]
    fn gaussian_decays_toward_zero_far_from_mean() {
        let tail = PulseHelper::gaussian(1.0, 0.0, 1.0, 0.05);
        assert!(tail.abs() < 1e-12);
    }
}
