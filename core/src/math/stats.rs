pub struct StatsHelper;

impl StatsHelper {
    pub fn rms(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = samples.iter().map(|&v| v * v).sum();
        (sum_sq / samples.len() as f64).sqrt()
    }

    /// Index of the largest sample, or `None` on an empty slice.
    pub fn peak_index(samples: &[f64]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, &value) in samples.iter().enumerate() {
            match best {
                Some((_, peak)) if value <= peak => {}
                _ => best = Some((index, value)),
            }
        }
        best.map(|(index, _)| index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rms_zero_sequence_yields_zero() {
        assert_eq!(StatsHelper::rms(&[]), 0.0);
        assert_eq!(StatsHelper::rms(&[0.0, 0.0]), 0.0);
    }

    #[test]
    fn rms_handles_single_value() {
        assert_eq!(StatsHelper::rms(&[4.0]), 4.0);
    }

    #[test]
    fn peak_index_finds_first_maximum() {
        assert_eq!(StatsHelper::peak_index(&[0.1, 0.9, 0.3, 0.9]), Some(1));
        assert_eq!(StatsHelper::peak_index(&[]), None);
    }
}
