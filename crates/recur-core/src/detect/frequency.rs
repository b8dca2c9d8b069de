//! Billing cadence matching
//!
//! The median gap between consecutive charges picks the closest known
//! cadence, so one skipped or doubled billing cycle does not break
//! detection. How many individual gaps actually fit that cadence is
//! reported separately as `gap_consistency`.

use chrono::NaiveDate;

use super::stats::median;
use crate::models::BillingFrequency;

/// A known billing cadence and how loosely it is matched
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cadence {
    pub frequency: BillingFrequency,
    pub expected_gap_days: f64,
    pub tolerance_days: f64,
    pub min_occurrences: usize,
}

/// Known cadences, shortest first
pub const CADENCES: [Cadence; 5] = [
    Cadence {
        frequency: BillingFrequency::Weekly,
        expected_gap_days: 7.0,
        tolerance_days: 2.0,
        min_occurrences: 4,
    },
    Cadence {
        frequency: BillingFrequency::Biweekly,
        expected_gap_days: 14.0,
        tolerance_days: 3.0,
        min_occurrences: 3,
    },
    Cadence {
        frequency: BillingFrequency::Monthly,
        expected_gap_days: 30.0,
        tolerance_days: 5.0,
        min_occurrences: 3,
    },
    Cadence {
        frequency: BillingFrequency::Quarterly,
        expected_gap_days: 90.0,
        tolerance_days: 10.0,
        min_occurrences: 2,
    },
    Cadence {
        frequency: BillingFrequency::Annual,
        expected_gap_days: 365.0,
        tolerance_days: 15.0,
        min_occurrences: 2,
    },
];

/// The cadence selected for a group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyMatch {
    pub cadence: BillingFrequency,
    pub expected_gap_days: f64,
    pub tolerance_days: f64,
    pub min_occurrences: usize,
    /// Fraction of gaps within tolerance of the expected gap (0-1)
    pub gap_consistency: f64,
}

/// Day gaps between consecutive dates
pub fn day_gaps(sorted_dates: &[NaiveDate]) -> Vec<i64> {
    sorted_dates
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days())
        .collect()
}

/// Match the gap pattern of date-sorted occurrences against the cadence table.
///
/// Returns `None` for fewer than two dates or when the median gap is more
/// than twice the tolerance away from the closest cadence.
pub fn analyze_frequency(sorted_dates: &[NaiveDate]) -> Option<FrequencyMatch> {
    let gaps = day_gaps(sorted_dates);
    if gaps.is_empty() {
        return None;
    }

    let gap_values: Vec<f64> = gaps.iter().map(|&g| g as f64).collect();
    let median_gap = median(&gap_values);

    let mut best: Option<(&Cadence, f64)> = None;
    for cadence in &CADENCES {
        let distance = (median_gap - cadence.expected_gap_days).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((cadence, distance)),
        }
    }

    let (cadence, distance) = best?;
    if distance > 2.0 * cadence.tolerance_days {
        return None;
    }

    let consistent = gap_values
        .iter()
        .filter(|&&gap| (gap - cadence.expected_gap_days).abs() <= cadence.tolerance_days)
        .count();

    Some(FrequencyMatch {
        cadence: cadence.frequency,
        expected_gap_days: cadence.expected_gap_days,
        tolerance_days: cadence.tolerance_days,
        min_occurrences: cadence.min_occurrences,
        gap_consistency: consistent as f64 / gap_values.len() as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn dates_with_gaps(start: NaiveDate, gaps: &[i64]) -> Vec<NaiveDate> {
        let mut dates = vec![start];
        let mut current = start;
        for gap in gaps {
            current += Duration::days(*gap);
            dates.push(current);
        }
        dates
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_monthly_calendar_gaps() {
        let dates = dates_with_gaps(start(), &[31, 29, 31]);
        let m = analyze_frequency(&dates).unwrap();
        assert_eq!(m.cadence, BillingFrequency::Monthly);
        assert_eq!(m.min_occurrences, 3);
        assert_eq!(m.gap_consistency, 1.0);
    }

    #[test]
    fn test_each_cadence_is_recognized() {
        let cases = [
            (7, BillingFrequency::Weekly),
            (14, BillingFrequency::Biweekly),
            (30, BillingFrequency::Monthly),
            (91, BillingFrequency::Quarterly),
            (365, BillingFrequency::Annual),
        ];
        for (gap, expected) in cases {
            let dates = dates_with_gaps(start(), &[gap, gap, gap]);
            assert_eq!(
                analyze_frequency(&dates).map(|m| m.cadence),
                Some(expected),
                "gap {}",
                gap
            );
        }
    }

    #[test]
    fn test_skipped_month_is_tolerated() {
        // One missed billing cycle doubles a single gap
        let dates = dates_with_gaps(start(), &[30, 31, 61, 30, 31]);
        let m = analyze_frequency(&dates).unwrap();
        assert_eq!(m.cadence, BillingFrequency::Monthly);
        assert!((m.gap_consistency - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_irregular_gaps_have_no_cadence() {
        // Median 50 is 20 days from monthly (limit 10) and 40 from quarterly (limit 20)
        let dates = dates_with_gaps(start(), &[45, 50, 55]);
        assert!(analyze_frequency(&dates).is_none());
    }

    #[test]
    fn test_within_double_tolerance_but_inconsistent() {
        // Median 39 is 9 days from monthly: accepted, but no gap is within ±5
        let dates = dates_with_gaps(start(), &[38, 39, 40]);
        let m = analyze_frequency(&dates).unwrap();
        assert_eq!(m.cadence, BillingFrequency::Monthly);
        assert_eq!(m.gap_consistency, 0.0);
    }

    #[test]
    fn test_too_few_dates() {
        assert!(analyze_frequency(&[]).is_none());
        assert!(analyze_frequency(&[start()]).is_none());
    }

    #[test]
    fn test_day_gaps() {
        let dates = dates_with_gaps(start(), &[3, 0, 10]);
        assert_eq!(day_gaps(&dates), vec![3, 0, 10]);
    }
}
