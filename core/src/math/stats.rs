pub struct StatsHelper;

impl StatsHelper {
    /// Arithmetic mean; NaN for an empty slice.
    pub fn mean(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return f64::NAN;
        }
        samples.iter().sum::<f64>() / samples.len() as f64
    }

    /// Sample standard deviation (n - 1 denominator); NaN below two samples.
    pub fn sample_std(samples: &[f64]) -> f64 {
        if samples.len() < 2 {
            return f64::NAN;
        }
        let mean = Self::mean(samples);
        let sum_sq: f64 = samples.iter().map(|&v| (v - mean) * (v - mean)).sum();
        (sum_sq / (samples.len() - 1) as f64).sqrt()
    }

    /// Min and max over the finite entries, `None` if there are none.
    pub fn finite_range(samples: &[f64]) -> Option<(f64, f64)> {
        samples
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Mean over the finite entries only.
    pub fn finite_mean(samples: &[f64]) -> f64 {
        let finite: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
        Self::mean(&finite)
    }
}
