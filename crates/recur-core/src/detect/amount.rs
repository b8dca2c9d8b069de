//! Amount consistency analysis
//!
//! Uses the median absolute amount as the "price" of a candidate group and
//! the median relative deviation from it as the variance, so a single
//! refund or one-off spike cannot dominate either statistic.

use super::stats::median;
use crate::models::AmountType;

/// Variance tiers: (max variance, tolerance used for matching, amount type)
const TOLERANCE_TIERS: [(f64, f64, AmountType); 2] = [
    (0.05, 0.05, AmountType::Fixed),
    (0.15, 0.15, AmountType::Fixed),
];
const LOOSE_TOLERANCE: f64 = 0.25;

/// Summary of the amounts in a candidate group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmountProfile {
    /// Median of absolute amounts
    pub core_amount: f64,
    /// Median of |amount - core| / core, clamped to 0-1
    pub relative_variance: f64,
    pub amount_type: AmountType,
    /// Amounts within `tolerance_used` of the core amount
    pub matching_count: usize,
    pub tolerance_used: f64,
}

impl AmountProfile {
    /// Fraction of `total` amounts that match the core amount
    pub fn match_ratio(&self, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        self.matching_count as f64 / total as f64
    }
}

/// Profile a group's signed amounts
pub fn analyze_amounts(signed_amounts: &[f64]) -> AmountProfile {
    let absolute: Vec<f64> = signed_amounts.iter().map(|a| a.abs()).collect();
    let core_amount = median(&absolute);

    let deviation = |amount: f64| -> f64 {
        if core_amount > f64::EPSILON {
            (amount - core_amount).abs() / core_amount
        } else if amount > f64::EPSILON {
            1.0
        } else {
            0.0
        }
    };

    let deviations: Vec<f64> = absolute.iter().map(|&a| deviation(a)).collect();
    let relative_variance = median(&deviations).clamp(0.0, 1.0);

    let (tolerance_used, mut amount_type) = TOLERANCE_TIERS
        .iter()
        .find(|(max_variance, _, _)| relative_variance <= *max_variance)
        .map(|(_, tolerance, amount_type)| (*tolerance, *amount_type))
        .unwrap_or((LOOSE_TOLERANCE, AmountType::Variable));

    let matching: Vec<f64> = absolute
        .iter()
        .copied()
        .filter(|&a| deviation(a) <= tolerance_used)
        .collect();

    // Outside the tight tier, matching amounts that still spread wider than
    // the tolerance band are usage-priced.
    let tight = relative_variance <= TOLERANCE_TIERS[0].0;
    if !tight && amount_type == AmountType::Fixed && core_amount > f64::EPSILON {
        let min = matching.iter().copied().fold(f64::INFINITY, f64::min);
        let max = matching.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if matching.len() > 1 && (max - min) / core_amount > tolerance_used {
            amount_type = AmountType::Variable;
        }
    }

    AmountProfile {
        core_amount,
        relative_variance,
        amount_type,
        matching_count: matching.len(),
        tolerance_used,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_amounts_are_tight_and_fixed() {
        let profile = analyze_amounts(&[-149.0, -149.0, -149.0, -149.0]);
        assert_eq!(profile.core_amount, 149.0);
        assert_eq!(profile.relative_variance, 0.0);
        assert_eq!(profile.tolerance_used, 0.05);
        assert_eq!(profile.amount_type, AmountType::Fixed);
        assert_eq!(profile.matching_count, 4);
    }

    #[test]
    fn test_price_increase_stays_fixed() {
        // 99 -> 109 is a ~10% step; most charges sit at 109, so the median
        // deviation is 0 and the tight tier applies
        let profile = analyze_amounts(&[-99.0, -99.0, -109.0, -109.0, -109.0]);
        assert_eq!(profile.core_amount, 109.0);
        assert_eq!(profile.tolerance_used, 0.05);
        assert_eq!(profile.amount_type, AmountType::Fixed);
        assert_eq!(profile.matching_count, 3);
    }

    #[test]
    fn test_tight_jitter_stays_fixed() {
        let profile = analyze_amounts(&[-97.0, -100.0, -100.0, -103.0]);
        assert_eq!(profile.core_amount, 100.0);
        assert!((profile.relative_variance - 0.015).abs() < 1e-9);
        assert_eq!(profile.tolerance_used, 0.05);
        assert_eq!(profile.amount_type, AmountType::Fixed);
        assert_eq!(profile.matching_count, 4);
    }

    #[test]
    fn test_usage_priced_amounts_are_variable() {
        let profile = analyze_amounts(&[-100.0, -120.0, -90.0, -110.0]);
        assert_eq!(profile.core_amount, 105.0);
        assert!(profile.relative_variance > 0.05 && profile.relative_variance <= 0.15);
        assert_eq!(profile.tolerance_used, 0.15);
        assert_eq!(profile.amount_type, AmountType::Variable);
        assert_eq!(profile.matching_count, 4);
    }

    #[test]
    fn test_high_variance_uses_loose_tolerance() {
        let profile = analyze_amounts(&[-50.0, -80.0, -100.0, -130.0, -160.0]);
        assert_eq!(profile.core_amount, 100.0);
        assert!((profile.relative_variance - 0.3).abs() < 1e-9);
        assert_eq!(profile.tolerance_used, 0.25);
        assert_eq!(profile.amount_type, AmountType::Variable);
        // 80 and 100 are within 25%; 50, 130 and 160 are not
        assert_eq!(profile.matching_count, 2);
    }

    #[test]
    fn test_single_outlier_does_not_move_core() {
        let profile = analyze_amounts(&[-79.0, -79.0, -79.0, -79.0, -899.0]);
        assert_eq!(profile.core_amount, 79.0);
        assert_eq!(profile.relative_variance, 0.0);
        assert_eq!(profile.amount_type, AmountType::Fixed);
        assert_eq!(profile.matching_count, 4);
    }

    #[test]
    fn test_zero_amounts() {
        let profile = analyze_amounts(&[0.0, 0.0, 0.0]);
        assert_eq!(profile.core_amount, 0.0);
        assert_eq!(profile.relative_variance, 0.0);
        assert_eq!(profile.matching_count, 3);
    }

    #[test]
    fn test_match_ratio() {
        let profile = analyze_amounts(&[-10.0, -10.0, -10.0, -50.0]);
        assert_eq!(profile.match_ratio(4), 0.75);
        assert_eq!(profile.match_ratio(0), 0.0);
    }
}
