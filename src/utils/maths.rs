//! Numeric helpers shared by the analysis modules.

/// A named Fibonacci retracement/extension level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FibLevel {
    pub ratio: &'static str,
    pub price: f64,
}

/// Standard retracement and extension levels between two prices.
///
/// Retracement levels (0.0 .. 1.0) interpolate between `start_price` and
/// `end_price`; extension levels (1.272, 1.618) project beyond `end_price`
/// in the direction of the move, so they stay direction-aware for falling
/// legs as well.
pub fn fibonacci_levels(start_price: f64, end_price: f64) -> Vec<FibLevel> {
    let diff = end_price - start_price;
    let direction = if diff > 0.0 { 1.0 } else { -1.0 };

    vec![
        FibLevel { ratio: "0.0", price: start_price },
        FibLevel { ratio: "0.236", price: start_price + 0.236 * diff },
        FibLevel { ratio: "0.382", price: start_price + 0.382 * diff },
        FibLevel { ratio: "0.5", price: start_price + 0.5 * diff },
        FibLevel { ratio: "0.618", price: start_price + 0.618 * diff },
        FibLevel { ratio: "0.786", price: start_price + 0.786 * diff },
        FibLevel { ratio: "1.0", price: end_price },
        FibLevel { ratio: "1.272", price: end_price + direction * 0.272 * diff.abs() },
        FibLevel { ratio: "1.618", price: end_price + direction * 0.618 * diff.abs() },
    ]
}

/// Fractional change from `base` to `value`; 0.0 when `base` is zero.
pub fn pct_change(base: f64, value: f64) -> f64 {
    if base == 0.0 {
        0.0
    } else {
        (value - base) / base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(levels: &[FibLevel], ratio: &str) -> f64 {
        levels
            .iter()
            .find(|l| l.ratio == ratio)
            .map(|l| l.price)
            .expect("level present")
    }

    #[test]
    fn test_fibonacci_levels_rising_leg() {
        let levels = fibonacci_levels(100.0, 200.0);
        assert!((level(&levels, "0.0") - 100.0).abs() < 1e-9);
        assert!((level(&levels, "0.5") - 150.0).abs() < 1e-9);
        assert!((level(&levels, "1.0") - 200.0).abs() < 1e-9);
        // Extension projects past the end of the move: 200 + 0.618 * 100
        assert!((level(&levels, "1.618") - 261.8).abs() < 1e-9);
    }

    #[test]
    fn test_fibonacci_levels_falling_leg() {
        let levels = fibonacci_levels(200.0, 100.0);
        assert!((level(&levels, "0.5") - 150.0).abs() < 1e-9);
        // Falling move extends downward: 100 - 0.618 * 100
        assert!((level(&levels, "1.618") - 38.2).abs() < 1e-9);
    }

    #[test]
    fn test_pct_change_guards_zero_base() {
        assert_eq!(pct_change(0.0, 50.0), 0.0);
        assert!((pct_change(100.0, 110.0) - 0.1).abs() < 1e-12);
        assert!((pct_change(100.0, 90.0) + 0.1).abs() < 1e-12);
    }
}
