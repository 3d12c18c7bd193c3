//! # Cardiocheck
//!
//! Heart disease risk form backed by a pre-trained binary classifier.
//!
//! This crate provides:
//! - Table-driven encoding of clinical form inputs into the model's feature vector
//! - A guarded invocation boundary around an opaque classifier
//! - A decision tree classifier loaded from a JSON export
//! - Terminal UI for entering measurements and reading the prediction
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (RawInput, FeatureVector, PredictionResult)
//! - `ports`: Trait definitions for external capabilities (Classifier)
//! - `adapters`: Concrete implementations (decision tree)
//! - `application`: Use cases orchestrating domain and ports
//! - `config`: Environment-driven settings
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{FeatureVector, Outcome, PredictionResult, RawInput};

/// Result type for Cardiocheck operations
pub type Result<T> = std::result::Result<T, CardiocheckError>;

/// Main error type for Cardiocheck
#[derive(Debug, thiserror::Error)]
pub enum CardiocheckError {
    #[error("Model not loaded: {0}")]
    ModelNotLoaded(String),

    #[error("Error loading the model: {0}")]
    Model(#[from] adapters::ModelError),

    #[error("Error making predictions: {0}")]
    Prediction(#[from] ports::ClassifierError),
}
