// gridmark/src/export/matching.rs

/// Precision at which exported axis values are compared to regenerated ones.
///
/// Both sides are rounded to `decimals` places (half away from zero) before comparison, so
/// two values a distance of exactly half a unit apart match only when they round the same
/// way: with one decimal `2.25` matches `2.30` but `2.20` does not match `2.25`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchTolerance {
    pub decimals: u32,
}

impl Default for MatchTolerance {
    fn default() -> Self {
        Self { decimals: 1 }
    }
}

impl MatchTolerance {
    pub fn new(decimals: u32) -> Self {
        Self { decimals }
    }

    pub fn matches(&self, exported: &str, generated: &str) -> bool {
        match (parse_number(exported), parse_number(generated)) {
            (Some(a), Some(b)) => self.quantize(a) == self.quantize(b),
            _ => exported.trim() == generated.trim(),
        }
    }

    /// Index of the value in `candidates` matching `exported`. A numerically exact candidate
    /// wins over the first tolerant one.
    pub fn position(&self, exported: &str, candidates: &[String]) -> Option<usize> {
        self.positions(exported, candidates).first().copied()
    }

    /// Every index in `candidates` matching `exported`: numerically exact ones first, then
    /// the tolerant ones, each group in sequence order.
    pub fn positions(&self, exported: &str, candidates: &[String]) -> Vec<usize> {
        let value = parse_number(exported);
        let mut exact: Vec<usize> = candidates
            .iter()
            .enumerate()
            .filter(|(_, candidate)| value.is_some() && parse_number(candidate) == value)
            .map(|(i, _)| i)
            .collect();
        let tolerant: Vec<usize> = candidates
            .iter()
            .enumerate()
            .filter(|(i, candidate)| !exact.contains(i) && self.matches(exported, candidate))
            .map(|(i, _)| i)
            .collect();
        exact.extend(tolerant);
        exact
    }

    fn quantize(&self, value: f64) -> f64 {
        let scale = 10f64.powi(self.decimals.min(15) as i32);
        (value * scale).round()
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorbs_formatting_drift() {
        let tolerance = MatchTolerance::default();
        assert!(tolerance.matches("3800", "3800.0"));
        assert!(tolerance.matches("0.0010", "0.001"));
        assert!(tolerance.matches("1805.26", "1805.3"));
        assert!(!tolerance.matches("1805.3", "1805.4"));
    }

    #[test]
    fn test_half_unit_boundary() {
        let tolerance = MatchTolerance::default();
        assert!(tolerance.matches("2.25", "2.30"));
        assert!(!tolerance.matches("2.20", "2.25"));
    }

    #[test]
    fn test_exact_candidate_wins() {
        let candidates = vec!["0.0010".to_string(), "0.0020".to_string()];
        let tolerance = MatchTolerance::default();
        assert_eq!(tolerance.position("0.0020", &candidates), Some(1));
        assert_eq!(tolerance.position("0.002", &candidates), Some(1));
    }

    #[test]
    fn test_positions_list_repeats_exact_first() {
        let candidates: Vec<String> = ["1.04", "1", "1", "2"].iter().map(|s| s.to_string()).collect();
        let tolerance = MatchTolerance::default();
        assert_eq!(tolerance.positions("1", &candidates), vec![1, 2, 0]);
        assert_eq!(tolerance.positions("3", &candidates), Vec::<usize>::new());
    }

    #[test]
    fn test_coarse_rounding_merges_small_steps() {
        // line interval steps of 0.0010 collapse at one decimal
        let candidates = vec!["0.0010".to_string(), "0.0020".to_string()];
        assert_eq!(MatchTolerance::default().position("0.0019", &candidates), Some(0));
        assert_eq!(MatchTolerance::new(4).position("0.0019", &candidates), None);
        assert_eq!(MatchTolerance::new(3).position("0.0019", &candidates), Some(1));
    }

    #[test]
    fn test_non_numeric_falls_back_to_text() {
        let tolerance = MatchTolerance::default();
        assert!(tolerance.matches(" high ", "high"));
        assert!(!tolerance.matches("high", "1.0"));
    }
}
