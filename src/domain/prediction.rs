//! Prediction result types.
//!
//! Represents the normalized output of one classifier invocation.

use serde::{Deserialize, Serialize};

/// Index of the "no disease" class in the classifier's probability output.
pub const NO_DISEASE_CLASS_INDEX: usize = 0;

/// Index of the "disease present" class in the classifier's probability output.
///
/// This is an assumption about the label space the artifact was trained with;
/// it cannot be checked from the artifact's outputs alone.
pub const DISEASE_CLASS_INDEX: usize = 1;

/// Tolerance for the two class probabilities summing to one.
pub const PROBABILITY_SUM_TOLERANCE: f64 = 1e-6;

/// Binary outcome predicted by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Label 0
    NoHeartDisease,
    /// Label 1
    HeartDisease,
}

impl Outcome {
    /// Map a classifier label to an outcome. Only 0 and 1 are valid.
    #[must_use]
    pub fn from_label(label: u8) -> Option<Self> {
        match label {
            0 => Some(Self::NoHeartDisease),
            1 => Some(Self::HeartDisease),
            _ => None,
        }
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::NoHeartDisease => (16, 185, 129), // Emerald (#10B981)
            Self::HeartDisease => (244, 63, 94),    // Rose (#F43F5E)
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoHeartDisease => write!(f, "No Heart Disease"),
            Self::HeartDisease => write!(f, "Heart Disease"),
        }
    }
}

/// Label and class probabilities for one submission. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// 0 = no disease, 1 = disease
    pub label: u8,

    /// P(no disease)
    pub p_no_disease: f64,

    /// P(disease)
    pub p_disease: f64,
}

impl PredictionResult {
    /// Outcome for the predicted label.
    ///
    /// Results are only built from labels in {0, 1}; a hand-built result with
    /// any other label trips a debug assertion and reads as disease otherwise.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        debug_assert!(
            self.label <= 1,
            "prediction label {} is outside {{0, 1}}",
            self.label
        );
        Outcome::from_label(self.label).unwrap_or(Outcome::HeartDisease)
    }

    /// `P(disease)` as a percentage string, e.g. `80.00%`.
    #[must_use]
    pub fn disease_percent(&self) -> String {
        format_percent(self.p_disease)
    }

    /// `P(no disease)` as a percentage string.
    #[must_use]
    pub fn no_disease_percent(&self) -> String {
        format_percent(self.p_no_disease)
    }
}

/// Format a probability with two decimals as a percentage.
#[must_use]
pub fn format_percent(p: f64) -> String {
    format!("{:.2}%", p * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_label() {
        assert_eq!(Outcome::from_label(0), Some(Outcome::NoHeartDisease));
        assert_eq!(Outcome::from_label(1), Some(Outcome::HeartDisease));
        assert_eq!(Outcome::from_label(2), None);
    }

    #[test]
    fn test_result_rendering() {
        let result = PredictionResult {
            label: 1,
            p_no_disease: 0.2,
            p_disease: 0.8,
        };
        assert_eq!(result.outcome().to_string(), "Heart Disease");
        assert_eq!(result.disease_percent(), "80.00%");
        assert_eq!(result.no_disease_percent(), "20.00%");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside {0, 1}")]
    fn test_out_of_range_label_is_flagged() {
        let result = PredictionResult {
            label: 7,
            p_no_disease: 0.5,
            p_disease: 0.5,
        };
        let _ = result.outcome();
    }

    #[test]
    fn test_no_disease_rendering() {
        let result = PredictionResult {
            label: 0,
            p_no_disease: 0.875,
            p_disease: 0.125,
        };
        assert_eq!(result.outcome().to_string(), "No Heart Disease");
        assert_eq!(result.disease_percent(), "12.50%");
    }
}
