//! Evenly spaced grids.

/// `n` evenly spaced values over the closed interval `[start, end]`.
///
/// The last value is `end` exactly (no accumulated rounding), matching the usual
/// `linspace` convention.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_interval_with_exact_endpoints() {
        let xs = linspace(0.0, 20.0, 20);
        assert_eq!(xs.len(), 20);
        assert_eq!(xs[0], 0.0);
        assert_eq!(xs[19], 20.0);

        let step = 20.0 / 19.0;
        for w in xs.windows(2) {
            assert!((w[1] - w[0] - step).abs() < 1e-12);
        }
    }

    #[test]
    fn degenerate_lengths() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
        assert_eq!(linspace(3.0, 9.0, 2), vec![3.0, 9.0]);
    }
}
