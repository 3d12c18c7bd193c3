//! Classifier port: Trait for the pre-trained binary model.
//!
//! This trait abstracts the model artifact from the application logic so the
//! invocation path can run against stubs in tests.

use crate::domain::FeatureVector;

/// Errors raised by a classifier while scoring one feature vector.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("invalid feature vector: {0}")]
    InvalidInput(String),

    #[error("incompatible feature schema: {0}")]
    Schema(String),

    #[error("numerical error: {0}")]
    Numerical(String),

    #[error("classifier failure: {0}")]
    Internal(String),
}

/// A trained binary classifier.
///
/// Loaded once at startup and read-only afterwards, so implementations are
/// shared across submissions without locking.
pub trait Classifier: Send + Sync {
    /// Predict the class label (0 = no disease, 1 = disease).
    ///
    /// # Errors
    /// Returns `ClassifierError` if the vector cannot be scored.
    fn predict(&self, features: &FeatureVector) -> Result<u8, ClassifierError>;

    /// Predict class probabilities `[P(class 0), P(class 1)]`.
    ///
    /// # Errors
    /// Returns `ClassifierError` if the vector cannot be scored.
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], ClassifierError>;
}
