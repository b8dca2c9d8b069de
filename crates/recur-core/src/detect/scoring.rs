//! Confidence scoring
//!
//! Four capped sub-scores are summed into a 0-100 confidence:
//!
//! | Sub-score  | Max | Driven by                                   |
//! |------------|-----|---------------------------------------------|
//! | amount     | 30  | relative amount variance (lower is better)  |
//! | timing     | 30  | gap consistency (higher is better)          |
//! | occurrence | 20  | number of charges                           |
//! | clarity    | 20  | timing and amount both strong at once       |
//!
//! The step functions are [`ThresholdTable`]s so every sub-score shares the
//! same boundary handling.

use super::amount::AmountProfile;
use super::frequency::FrequencyMatch;
use crate::models::{ConfidenceBreakdown, ConfidenceLevel};

/// Default admission threshold for detected subscriptions
pub const DEFAULT_MIN_CONFIDENCE: u32 = 70;

/// How a threshold compares against the measured value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Step applies when value <= threshold
    AtMost,
    /// Step applies when value >= threshold
    AtLeast,
}

/// Ordered step function: the first matching step wins, else `fallback`
#[derive(Debug, Clone, Copy)]
pub struct ThresholdTable {
    pub bound: Bound,
    pub steps: &'static [(f64, u32)],
    pub fallback: u32,
}

impl ThresholdTable {
    pub fn score(&self, value: f64) -> u32 {
        self.steps
            .iter()
            .find(|(threshold, _)| match self.bound {
                Bound::AtMost => value <= *threshold,
                Bound::AtLeast => value >= *threshold,
            })
            .map(|(_, points)| *points)
            .unwrap_or(self.fallback)
    }
}

pub const AMOUNT_SCORE: ThresholdTable = ThresholdTable {
    bound: Bound::AtMost,
    steps: &[(0.02, 30), (0.05, 25), (0.10, 20), (0.15, 15), (0.25, 10)],
    fallback: 5,
};

pub const TIMING_SCORE: ThresholdTable = ThresholdTable {
    bound: Bound::AtLeast,
    steps: &[(0.95, 30), (0.90, 25), (0.80, 20), (0.70, 15), (0.60, 10)],
    fallback: 5,
};

pub const OCCURRENCE_SCORE: ThresholdTable = ThresholdTable {
    bound: Bound::AtLeast,
    steps: &[(10.0, 20), (6.0, 15), (4.0, 10), (3.0, 7)],
    fallback: 4,
};

/// Score plus tier and per-component breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfidenceResult {
    pub confidence: u32,
    pub level: ConfidenceLevel,
    pub breakdown: ConfidenceBreakdown,
}

/// Joint check that timing and amounts are strong together
fn clarity_score(frequency: Option<&FrequencyMatch>, match_ratio: f64) -> u32 {
    match frequency {
        Some(f) if f.gap_consistency >= 0.8 && match_ratio >= 0.8 => 20,
        Some(f) if f.gap_consistency >= 0.6 && match_ratio >= 0.6 => 15,
        Some(_) => 10,
        None => 5,
    }
}

/// Combine amount, timing, occurrence and clarity into one confidence score
pub fn score_confidence(
    amount: &AmountProfile,
    frequency: Option<&FrequencyMatch>,
    occurrence_count: usize,
    total_in_group: usize,
) -> ConfidenceResult {
    let gap_consistency = frequency.map(|f| f.gap_consistency).unwrap_or(0.0);
    let match_ratio = amount.match_ratio(total_in_group);

    let breakdown = ConfidenceBreakdown {
        amount_score: AMOUNT_SCORE.score(amount.relative_variance),
        timing_score: TIMING_SCORE.score(gap_consistency),
        occurrence_score: OCCURRENCE_SCORE.score(occurrence_count as f64),
        clarity_score: clarity_score(frequency, match_ratio),
    };
    let confidence = breakdown.total().min(100);

    ConfidenceResult {
        confidence,
        level: ConfidenceLevel::from_score(confidence),
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AmountType, BillingFrequency};

    fn profile(relative_variance: f64, matching_count: usize) -> AmountProfile {
        AmountProfile {
            core_amount: 100.0,
            relative_variance,
            amount_type: AmountType::Fixed,
            matching_count,
            tolerance_used: 0.05,
        }
    }

    fn monthly(gap_consistency: f64) -> FrequencyMatch {
        FrequencyMatch {
            cadence: BillingFrequency::Monthly,
            expected_gap_days: 30.0,
            tolerance_days: 5.0,
            min_occurrences: 3,
            gap_consistency,
        }
    }

    #[test]
    fn test_amount_score_boundaries() {
        assert_eq!(AMOUNT_SCORE.score(0.0), 30);
        assert_eq!(AMOUNT_SCORE.score(0.02), 30);
        assert_eq!(AMOUNT_SCORE.score(0.03), 25);
        assert_eq!(AMOUNT_SCORE.score(0.10), 20);
        assert_eq!(AMOUNT_SCORE.score(0.15), 15);
        assert_eq!(AMOUNT_SCORE.score(0.25), 10);
        assert_eq!(AMOUNT_SCORE.score(0.26), 5);
    }

    #[test]
    fn test_amount_score_is_monotonic() {
        let mut previous = u32::MAX;
        for step in 0..=100 {
            let score = AMOUNT_SCORE.score(step as f64 / 100.0);
            assert!(score <= previous, "score rose at variance {}", step);
            previous = score;
        }
    }

    #[test]
    fn test_timing_score_boundaries() {
        assert_eq!(TIMING_SCORE.score(1.0), 30);
        assert_eq!(TIMING_SCORE.score(0.95), 30);
        assert_eq!(TIMING_SCORE.score(0.9), 25);
        assert_eq!(TIMING_SCORE.score(0.8), 20);
        assert_eq!(TIMING_SCORE.score(0.75), 15);
        assert_eq!(TIMING_SCORE.score(0.6), 10);
        assert_eq!(TIMING_SCORE.score(0.5), 5);
    }

    #[test]
    fn test_occurrence_score_boundaries() {
        assert_eq!(OCCURRENCE_SCORE.score(12.0), 20);
        assert_eq!(OCCURRENCE_SCORE.score(10.0), 20);
        assert_eq!(OCCURRENCE_SCORE.score(6.0), 15);
        assert_eq!(OCCURRENCE_SCORE.score(4.0), 10);
        assert_eq!(OCCURRENCE_SCORE.score(3.0), 7);
        assert_eq!(OCCURRENCE_SCORE.score(2.0), 4);
    }

    #[test]
    fn test_perfect_monthly_group() {
        let result = score_confidence(&profile(0.0, 4), Some(&monthly(1.0)), 4, 4);
        assert_eq!(result.breakdown.amount_score, 30);
        assert_eq!(result.breakdown.timing_score, 30);
        assert_eq!(result.breakdown.occurrence_score, 10);
        assert_eq!(result.breakdown.clarity_score, 20);
        assert_eq!(result.confidence, 90);
        assert_eq!(result.level, ConfidenceLevel::High);
    }

    #[test]
    fn test_clarity_penalizes_one_sided_regularity() {
        // Perfect timing, but only half the amounts match
        let result = score_confidence(&profile(0.30, 3), Some(&monthly(1.0)), 6, 6);
        assert_eq!(result.breakdown.clarity_score, 10);

        let relaxed = score_confidence(&profile(0.10, 4), Some(&monthly(0.7)), 6, 6);
        assert_eq!(relaxed.breakdown.clarity_score, 15);
    }

    #[test]
    fn test_no_cadence() {
        let result = score_confidence(&profile(0.0, 3), None, 3, 3);
        assert_eq!(result.breakdown.timing_score, 5);
        assert_eq!(result.breakdown.clarity_score, 5);
        assert_eq!(result.confidence, 30 + 5 + 7 + 5);
        assert_eq!(result.level, ConfidenceLevel::Low);
    }

    #[test]
    fn test_breakdown_sums_to_confidence() {
        let result = score_confidence(&profile(0.12, 5), Some(&monthly(0.85)), 7, 8);
        assert_eq!(result.breakdown.total(), result.confidence);
        assert_eq!(result.level, ConfidenceLevel::from_score(result.confidence));
    }
}
