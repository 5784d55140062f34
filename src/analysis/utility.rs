/// Averages per-match values for one team. A team with no recorded values
/// averages to 0.0.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[4.0, 0.0]), 2.0);
        assert_eq!(mean(&[-1.0, 1.0, 3.0]), 1.0);
    }
}
