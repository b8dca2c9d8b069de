//! Small statistics helpers shared by the analyzers

/// Calculate median of a slice (mean of the middle pair for even lengths)
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len().is_multiple_of(2) {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Most frequent value; ties go to the smallest value
pub fn mode(values: impl IntoIterator<Item = u32>) -> Option<u32> {
    let mut counts = std::collections::BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0usize) += 1;
    }

    let mut best: Option<(u32, usize)> = None;
    // BTreeMap iterates in ascending key order, so strict > keeps the smallest on ties
    for (value, count) in counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((value, count)),
        }
    }
    best.map(|(value, _)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), 0.0);
        assert_eq!(median(&[3.0]), 3.0);
        assert_eq!(median(&[5.0, 1.0, 3.0]), 3.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_mode_prefers_smallest_on_tie() {
        assert_eq!(mode([15, 1, 15, 1, 28]), Some(1));
        assert_eq!(mode([28, 15, 15]), Some(15));
        assert_eq!(mode(Vec::<u32>::new()), None);
    }
}
