//! Domain layer: Core business types and logic.
//!
//! Pure types with no I/O: the form record, its categorical code tables,
//! the encoded feature vector and the prediction result.

mod categorical;
mod features;
mod patient;
mod prediction;

pub use categorical::{
    Categorical, ChestPainType, ExerciseAngina, FastingBloodSugar, Gender, MajorVessels,
    RestingEcg, Slope, Thalassemia, UnknownCategory,
};
pub use features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use patient::{
    RawInput, AGE_RANGE, CHOLESTEROL_RANGE, MAX_HEART_RATE_RANGE, RESTING_BP_RANGE,
    ST_DEPRESSION_RANGE,
};
pub use prediction::{
    format_percent, Outcome, PredictionResult, DISEASE_CLASS_INDEX, NO_DISEASE_CLASS_INDEX,
    PROBABILITY_SUM_TOLERANCE,
};
