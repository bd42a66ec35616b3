// 🎓 GPA Computation & Classification
// Credit-weighted mean and the four fixed bands

use crate::semester::Entry;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// WEIGHTED AVERAGE
// ============================================================================

/// Σ(credits·points) / Σ(credits), or 0 when there is nothing to divide by.
pub fn compute_gpa<'a, I>(entries: I) -> f64
where
    I: IntoIterator<Item = &'a Entry>,
{
    let (weighted, credits) = entries
        .into_iter()
        .fold((0.0, 0.0), |(weighted, credits), e| {
            (weighted + e.weighted_points(), credits + e.credits)
        });

    if credits == 0.0 {
        0.0
    } else {
        weighted / credits
    }
}

/// Two decimal places, as shown to the user.
pub fn format_gpa(gpa: f64) -> String {
    format!("{:.2}", gpa)
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

pub const DISTINCTION_THRESHOLD: f64 = 3.7;
pub const MERIT_PASS_THRESHOLD: f64 = 3.0;
pub const PASS_THRESHOLD: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Classification {
    Fail,
    Pass,
    MeritPass,
    Distinction,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Distinction => "Distinction",
            Classification::MeritPass => "Merit Pass",
            Classification::Pass => "Pass",
            Classification::Fail => "Fail",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boundary values belong to the higher band. NaN falls through to Fail.
pub fn classify(gpa: f64) -> Classification {
    match gpa {
        g if g >= DISTINCTION_THRESHOLD => Classification::Distinction,
        g if g >= MERIT_PASS_THRESHOLD => Classification::MeritPass,
        g if g >= PASS_THRESHOLD => Classification::Pass,
        _ => Classification::Fail,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(credits: f64, points: f64) -> Entry {
        Entry::new("m", "g", credits, points)
    }

    #[test]
    fn test_weighted_average() {
        let entries = vec![entry(3.0, 4.0), entry(2.0, 3.0)];
        let gpa = compute_gpa(&entries);
        assert!((gpa - 3.6).abs() < 1e-9);
    }

    #[test]
    fn test_empty_is_zero() {
        let entries: Vec<Entry> = Vec::new();
        assert_eq!(compute_gpa(&entries), 0.0);
    }

    #[test]
    fn test_zero_credits_is_zero() {
        let entries = vec![entry(0.0, 4.0), entry(0.0, 2.0)];
        assert_eq!(compute_gpa(&entries), 0.0);
    }

    #[test]
    fn test_order_does_not_matter() {
        let forward = vec![entry(3.0, 4.0), entry(2.0, 3.0), entry(4.0, 2.3), entry(1.0, 0.0)];
        let mut reversed = forward.clone();
        reversed.reverse();
        let mut rotated = forward.clone();
        rotated.rotate_left(2);

        let a = compute_gpa(&forward);
        assert!((a - compute_gpa(&reversed)).abs() < 1e-12);
        assert!((a - compute_gpa(&rotated)).abs() < 1e-12);
    }

    #[test]
    fn test_single_entry_is_its_points() {
        assert!((compute_gpa(&[entry(5.0, 3.3)]) - 3.3).abs() < 1e-12);
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(4.0), Classification::Distinction);
        assert_eq!(classify(3.7), Classification::Distinction);
        assert_eq!(classify(3.69), Classification::MeritPass);
        assert_eq!(classify(3.0), Classification::MeritPass);
        assert_eq!(classify(2.99), Classification::Pass);
        assert_eq!(classify(2.0), Classification::Pass);
        assert_eq!(classify(1.99), Classification::Fail);
        assert_eq!(classify(0.0), Classification::Fail);
    }

    #[test]
    fn test_classify_out_of_range() {
        assert_eq!(classify(-1.0), Classification::Fail);
        assert_eq!(classify(9.5), Classification::Distinction);
        assert_eq!(classify(f64::NEG_INFINITY), Classification::Fail);
        assert_eq!(classify(f64::INFINITY), Classification::Distinction);
    }

    #[test]
    fn test_classify_is_monotonic() {
        let mut previous = classify(-5.0);
        let mut g = -5.0;
        while g <= 5.0 {
            let band = classify(g);
            assert!(band >= previous, "band dropped at {}", g);
            previous = band;
            g += 0.01;
        }
    }

    #[test]
    fn test_labels_and_format() {
        assert_eq!(Classification::MeritPass.to_string(), "Merit Pass");
        assert_eq!(Classification::Distinction.as_str(), "Distinction");
        assert_eq!(format_gpa(3.6), "3.60");
        assert_eq!(format_gpa(0.0), "0.00");
        assert_eq!(format_gpa(2.0 / 3.0), "0.67");
    }
}
