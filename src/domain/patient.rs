//! Patient input record as collected by the form.
//!
//! Field domains follow the UCI Cleveland heart disease attributes.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::categorical::{
    ChestPainType, ExerciseAngina, FastingBloodSugar, Gender, MajorVessels, RestingEcg, Slope,
    Thalassemia,
};

/// Age in years.
pub const AGE_RANGE: RangeInclusive<u32> = 0..=120;
/// Resting blood pressure in mm Hg.
pub const RESTING_BP_RANGE: RangeInclusive<u32> = 0..=300;
/// Serum cholesterol in mg/dl.
pub const CHOLESTEROL_RANGE: RangeInclusive<u32> = 0..=600;
/// Maximum heart rate achieved.
pub const MAX_HEART_RATE_RANGE: RangeInclusive<u32> = 60..=200;
/// ST depression induced by exercise relative to rest.
pub const ST_DEPRESSION_RANGE: RangeInclusive<f64> = 0.0..=10.0;

/// One form submission, before numeric encoding.
///
/// Built fresh per submission and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    pub age: u32,
    pub gender: Gender,
    pub chest_pain_type: ChestPainType,
    pub resting_blood_pressure: u32,
    pub cholesterol: u32,
    pub fasting_blood_sugar: FastingBloodSugar,
    pub resting_ecg: RestingEcg,
    pub max_heart_rate: u32,
    pub exercise_angina: ExerciseAngina,
    pub st_depression: f64,
    pub slope: Slope,
    pub number_of_major_vessels: MajorVessels,
    pub thalassemia: Thalassemia,
}

impl Default for RawInput {
    /// Initial form values. Choices default to their first listed option.
    fn default() -> Self {
        Self {
            age: 25,
            gender: Gender::Male,
            chest_pain_type: ChestPainType::TypicalAngina,
            resting_blood_pressure: 120,
            cholesterol: 200,
            fasting_blood_sugar: FastingBloodSugar::Above120,
            resting_ecg: RestingEcg::Normal,
            max_heart_rate: 150,
            exercise_angina: ExerciseAngina::Yes,
            st_depression: 1.0,
            slope: Slope::Upsloping,
            number_of_major_vessels: MajorVessels::Zero,
            thalassemia: Thalassemia::Normal,
        }
    }
}

impl RawInput {
    /// Check the numeric fields against the ranges the form enforces.
    ///
    /// Categorical fields are closed enums and always valid.
    ///
    /// # Errors
    /// Returns every violation found, one message per field.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        check_range(&mut errors, "Age", self.age, &AGE_RANGE);
        check_range(
            &mut errors,
            "Resting Blood Pressure",
            self.resting_blood_pressure,
            &RESTING_BP_RANGE,
        );
        check_range(&mut errors, "Cholesterol", self.cholesterol, &CHOLESTEROL_RANGE);
        check_range(
            &mut errors,
            "Max Heart Rate",
            self.max_heart_rate,
            &MAX_HEART_RATE_RANGE,
        );
        if !ST_DEPRESSION_RANGE.contains(&self.st_depression) {
            errors.push(format!(
                "ST Depression {} out of range [{}, {}]",
                self.st_depression,
                ST_DEPRESSION_RANGE.start(),
                ST_DEPRESSION_RANGE.end()
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_range(errors: &mut Vec<String>, label: &str, value: u32, range: &RangeInclusive<u32>) {
    if !range.contains(&value) {
        errors.push(format!(
            "{label} {value} out of range [{}, {}]",
            range.start(),
            range.end()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_form_initial_values() {
        let raw = RawInput::default();
        assert_eq!(raw.age, 25);
        assert_eq!(raw.resting_blood_pressure, 120);
        assert_eq!(raw.cholesterol, 200);
        assert_eq!(raw.max_heart_rate, 150);
        assert!((raw.st_depression - 1.0).abs() < f64::EPSILON);
        assert!(raw.validate().is_ok());
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let invalid = RawInput {
            age: 130,
            max_heart_rate: 59,
            st_depression: 10.5,
            ..Default::default()
        };

        let errors = invalid.validate().expect_err("should reject");
        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("Age 130"));
        assert!(errors[1].starts_with("Max Heart Rate 59"));
        assert!(errors[2].starts_with("ST Depression"));
    }

    #[test]
    fn test_validation_rejects_nan_st_depression() {
        let invalid = RawInput {
            st_depression: f64::NAN,
            ..Default::default()
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let edge = RawInput {
            age: 120,
            resting_blood_pressure: 300,
            cholesterol: 0,
            max_heart_rate: 60,
            st_depression: 10.0,
            ..Default::default()
        };
        assert!(edge.validate().is_ok());
    }
}
