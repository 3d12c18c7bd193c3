//! Numeric feature vector fed to the classifier.

use serde::{Deserialize, Serialize};

use super::categorical::Categorical;
use super::patient::RawInput;

/// Number of model input columns.
pub const FEATURE_COUNT: usize = 13;

/// Column names in the order the classifier was trained on.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// Encoded input record.
///
/// Field declaration order is the model's column order; serialization and
/// [`FeatureVector::to_array`] both follow it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub age: u32,
    pub sex: u8,
    pub cp: u8,
    pub trestbps: u32,
    pub chol: u32,
    pub fbs: u8,
    pub restecg: u8,
    pub thalach: u32,
    pub exang: u8,
    pub oldpeak: f64,
    pub slope: u8,
    pub ca: u8,
    pub thal: u8,
}

impl FeatureVector {
    /// Encode a raw form record. Total over every constructible `RawInput`.
    #[must_use]
    pub fn encode(raw: &RawInput) -> Self {
        Self {
            age: raw.age,
            sex: raw.gender.code(),
            cp: raw.chest_pain_type.code(),
            trestbps: raw.resting_blood_pressure,
            chol: raw.cholesterol,
            fbs: raw.fasting_blood_sugar.code(),
            restecg: raw.resting_ecg.code(),
            thalach: raw.max_heart_rate,
            exang: raw.exercise_angina.code(),
            oldpeak: raw.st_depression,
            slope: raw.slope.code(),
            ca: raw.number_of_major_vessels.code(),
            thal: raw.thalassemia.code(),
        }
    }

    /// Values in model column order.
    #[must_use]
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            f64::from(self.age),
            f64::from(self.sex),
            f64::from(self.cp),
            f64::from(self.trestbps),
            f64::from(self.chol),
            f64::from(self.fbs),
            f64::from(self.restecg),
            f64::from(self.thalach),
            f64::from(self.exang),
            self.oldpeak,
            f64::from(self.slope),
            f64::from(self.ca),
            f64::from(self.thal),
        ]
    }

    /// `(column name, value)` pairs, for display.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> {
        FEATURE_NAMES.into_iter().zip(self.to_array())
    }
}

impl From<&RawInput> for FeatureVector {
    fn from(raw: &RawInput) -> Self {
        Self::encode(raw)
    }
}
