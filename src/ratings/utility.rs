/// Accumulates a sum and count so a mean can be taken after one pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunningMean {
    sum: f64,
    count: usize,
}

impl RunningMean {
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// Arithmetic mean of the pushed values. Returns 0.0 when nothing was pushed.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }

    /// Mean rounded to one decimal place. Scales the sum before dividing so
    /// exact halves such as 4.25 are not lost to division error.
    pub fn mean_one_decimal(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        round_half_up(self.sum * 10.0 / self.count as f64) / 10.0
    }
}

/// Rounds to the nearest integer, with halves going toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 { floor + 1.0 } else { floor }
}

/// Share of `part` in `total` as a percentage. Returns 0.0 when `total` is zero.
///
/// Multiplies before dividing so exact halves (23 of 40 is 57.5) stay exact.
pub fn pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 * 100.0) / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty_is_zero() {
        assert_eq!(RunningMean::default().mean(), 0.0);
    }

    #[test]
    fn test_mean_normal_values() {
        let mut m = RunningMean::default();
        for v in [5.0, 4.0, 4.0] {
            m.push(v);
        }
        assert!((m.mean() - 13.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_mean_one_decimal() {
        let mut m = RunningMean::default();
        assert_eq!(m.mean_one_decimal(), 0.0);
        for v in [5.0, 4.0, 4.0] {
            m.push(v);
        }
        assert_eq!(m.mean_one_decimal(), 4.3);
    }

    #[test]
    fn test_mean_one_decimal_keeps_exact_halves() {
        // 4.25 and 1.45 are halves at one decimal
        let mut m = RunningMean::default();
        for v in [5.0, 4.0, 4.0, 4.0] {
            m.push(v);
        }
        assert_eq!(m.mean_one_decimal(), 4.3);

        let mut m = RunningMean::default();
        for v in [1.0; 11].into_iter().chain([2.0; 9]) {
            m.push(v);
        }
        assert_eq!(m.mean_one_decimal(), 1.5);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(2.49), 2.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(3.6), 4.0);
    }

    #[test]
    fn test_pct_with_zero_total() {
        assert_eq!(pct(10, 0), 0.0);
    }

    #[test]
    fn test_pct_normal_values() {
        assert_eq!(pct(50, 100), 50.0);
        assert_eq!(pct(1, 4), 25.0);
    }

    #[test]
    fn test_pct_exact_halves() {
        assert_eq!(pct(23, 40), 57.5);
        assert_eq!(pct(29, 200), 14.5);
        assert_eq!(pct(57, 200), 28.5);
        assert_eq!(round_half_up(pct(23, 40)), 58.0);
    }
}
