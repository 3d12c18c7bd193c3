//! Prediction service: Encodes a form record and invokes the classifier.
//!
//! This service coordinates:
//! - Encoding the raw input into the model's feature vector
//! - Calling `predict` and `predict_proba`
//! - Checking the classifier's output contract
//!
//! Every failure inside the classifier call, panics included, is caught here
//! and returned as `CardiocheckError::Prediction`. Nothing is retried and no
//! partial result is produced.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::adapters::ModelError;
use crate::domain::{
    FeatureVector, Outcome, PredictionResult, RawInput, DISEASE_CLASS_INDEX,
    NO_DISEASE_CLASS_INDEX, PROBABILITY_SUM_TOLERANCE,
};
use crate::ports::{Classifier, ClassifierError};
use crate::{CardiocheckError, Result};

/// Service for running one prediction per form submission.
///
/// Holds the classifier loaded at startup, or the reason it failed to load.
/// The classifier is never mutated, so the service can be shared freely.
pub struct PredictionService<C>
where
    C: Classifier,
{
    classifier: std::result::Result<Arc<C>, String>,
}

impl<C> PredictionService<C>
where
    C: Classifier,
{
    /// Create a service around a loaded classifier.
    pub fn new(classifier: Arc<C>) -> Self {
        Self {
            classifier: Ok(classifier),
        }
    }

    /// Create a service with no usable classifier.
    ///
    /// Every prediction fails with `ModelNotLoaded` carrying `reason`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            classifier: Err(reason.into()),
        }
    }

    /// Create a service from the outcome of loading the model artifact.
    ///
    /// A load failure is logged and kept as the reason for later predictions;
    /// it never aborts startup.
    pub fn from_load_result(loaded: std::result::Result<C, ModelError>) -> Self {
        match loaded {
            Ok(classifier) => Self::new(Arc::new(classifier)),
            Err(e) => {
                let err = CardiocheckError::from(e);
                tracing::error!("{}", err);
                Self::unavailable(err.to_string())
            }
        }
    }

    /// Whether a classifier is available.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.classifier.is_ok()
    }

    /// Load error message, if the classifier is unavailable.
    #[must_use]
    pub fn load_error(&self) -> Option<&str> {
        self.classifier.as_ref().err().map(String::as_str)
    }

    /// Encode a form record and run the prediction.
    ///
    /// # Errors
    /// See [`PredictionService::predict_features`].
    pub fn predict(&self, raw: &RawInput) -> Result<PredictionResult> {
        self.predict_features(&FeatureVector::encode(raw))
    }

    /// Run the classifier on an already encoded vector.
    ///
    /// # Errors
    /// Returns `ModelNotLoaded` if startup could not load a classifier, and
    /// `Prediction` if the classifier fails, panics, or returns output outside
    /// its contract.
    pub fn predict_features(&self, features: &FeatureVector) -> Result<PredictionResult> {
        let classifier = self
            .classifier
            .as_ref()
            .map_err(|reason| CardiocheckError::ModelNotLoaded(reason.clone()))?;

        let (label, proba) = guarded(|| {
            let label = classifier.predict(features)?;
            let proba = classifier.predict_proba(features)?;
            Ok((label, proba))
        })
        .map_err(|e| {
            tracing::warn!("Prediction failed: {}", e);
            CardiocheckError::Prediction(e)
        })?;

        let result = check_output(label, proba)?;

        tracing::info!(
            "Prediction complete: outcome={}, p_disease={:.4}",
            result.outcome(),
            result.p_disease
        );

        Ok(result)
    }
}

/// Run a classifier call, turning a panic into `ClassifierError::Internal`.
fn guarded<T>(
    call: impl FnOnce() -> std::result::Result<T, ClassifierError>,
) -> std::result::Result<T, ClassifierError> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(ClassifierError::Internal(format!(
                "classifier panicked: {message}"
            )))
        }
    }
}

/// Check the classifier output and pair probabilities with class indices.
fn check_output(label: u8, proba: [f64; 2]) -> Result<PredictionResult> {
    let outcome = Outcome::from_label(label).ok_or_else(|| {
        ClassifierError::Internal(format!("label {label} is outside {{0, 1}}"))
    })?;

    if proba.iter().any(|p| !p.is_finite() || !(0.0..=1.0).contains(p)) {
        return Err(ClassifierError::Numerical(format!(
            "probabilities {proba:?} are not within [0, 1]"
        ))
        .into());
    }
    let sum = proba[0] + proba[1];
    if (sum - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
        return Err(ClassifierError::Numerical(format!(
            "probabilities {proba:?} sum to {sum}, expected 1"
        ))
        .into());
    }

    let result = PredictionResult {
        label,
        p_no_disease: proba[NO_DISEASE_CLASS_INDEX],
        p_disease: proba[DISEASE_CLASS_INDEX],
    };

    // Label ordering is the artifact's contract; only flag disagreement.
    let disagrees = match outcome {
        Outcome::HeartDisease => result.p_disease < result.p_no_disease,
        Outcome::NoHeartDisease => result.p_disease > result.p_no_disease,
    };
    if disagrees {
        tracing::warn!(
            "Predicted label {} disagrees with class probabilities {:?}",
            label,
            proba
        );
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::tree::DecisionTreeClassifier;
    use std::result::Result;
    use crate::domain::{
        ChestPainType, ExerciseAngina, FastingBloodSugar, Gender, MajorVessels, RestingEcg,
        Slope, Thalassemia,
    };
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Classifier returning canned outputs.
    struct StubClassifier {
        label: Result<u8, ClassifierError>,
        proba: Result<[f64; 2], ClassifierError>,
        calls: AtomicUsize,
    }

    impl StubClassifier {
        fn returning(label: u8, proba: [f64; 2]) -> Self {
            Self {
                label: Ok(label),
                proba: Ok(proba),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Classifier for StubClassifier {
        fn predict(&self, _features: &FeatureVector) -> Result<u8, ClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.label.clone()
        }

        fn predict_proba(&self, _features: &FeatureVector) -> Result<[f64; 2], ClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.proba.clone()
        }
    }

    struct PanickingClassifier;

    impl Classifier for PanickingClassifier {
        fn predict(&self, _features: &FeatureVector) -> Result<u8, ClassifierError> {
            panic!("matrix shape mismatch");
        }

        fn predict_proba(&self, _features: &FeatureVector) -> Result<[f64; 2], ClassifierError> {
            Ok([0.5, 0.5])
        }
    }

    fn cleveland_sample() -> RawInput {
        RawInput {
            age: 63,
            gender: Gender::Male,
            chest_pain_type: ChestPainType::TypicalAngina,
            resting_blood_pressure: 145,
            cholesterol: 233,
            fasting_blood_sugar: FastingBloodSugar::Above120,
            resting_ecg: RestingEcg::Normal,
            max_heart_rate: 150,
            exercise_angina: ExerciseAngina::No,
            st_depression: 2.3,
            slope: Slope::Downsloping,
            number_of_major_vessels: MajorVessels::Zero,
            thalassemia: Thalassemia::FixedDefect,
        }
    }

    fn service(stub: StubClassifier) -> PredictionService<StubClassifier> {
        PredictionService::new(Arc::new(stub))
    }

    #[test]
    fn test_stub_result_is_paired_by_class_index() {
        let svc = service(StubClassifier::returning(1, [0.2, 0.8]));
        let result = svc.predict(&cleveland_sample()).expect("should predict");

        assert_eq!(
            result,
            PredictionResult {
                label: 1,
                p_no_disease: 0.2,
                p_disease: 0.8,
            }
        );
        assert_eq!(result.outcome().to_string(), "Heart Disease");
        assert_eq!(result.disease_percent(), "80.00%");
    }

    #[test]
    fn test_failure_on_predict_is_reported() {
        let svc = service(StubClassifier {
            label: Err(ClassifierError::Schema("expected 14 columns".into())),
            proba: Ok([0.2, 0.8]),
            calls: AtomicUsize::new(0),
        });

        let err = svc.predict(&cleveland_sample()).expect_err("must fail");
        assert!(matches!(err, CardiocheckError::Prediction(ClassifierError::Schema(_))));
        assert!(err.to_string().contains("expected 14 columns"));
    }

    #[test]
    fn test_failure_does_not_affect_next_submission() {
        let failing = service(StubClassifier {
            label: Ok(0),
            proba: Err(ClassifierError::Numerical("overflow".into())),
            calls: AtomicUsize::new(0),
        });
        assert!(failing.predict(&cleveland_sample()).is_err());
        assert!(failing.predict(&cleveland_sample()).is_err());

        let svc = service(StubClassifier::returning(0, [0.9, 0.1]));
        assert!(svc.predict(&cleveland_sample()).is_ok());
        assert!(svc.predict(&cleveland_sample()).is_ok());
    }

    #[test]
    fn test_panic_is_caught() {
        let svc = PredictionService::new(Arc::new(PanickingClassifier));
        let err = svc.predict(&cleveland_sample()).expect_err("must fail");
        let msg = err.to_string();
        assert!(msg.contains("panicked"));
        assert!(msg.contains("matrix shape mismatch"));
    }

    #[test]
    fn test_rejects_out_of_contract_output() {
        let bad_label = service(StubClassifier::returning(2, [0.2, 0.8]));
        assert!(matches!(
            bad_label.predict(&cleveland_sample()),
            Err(CardiocheckError::Prediction(ClassifierError::Internal(_)))
        ));

        let bad_sum = service(StubClassifier::returning(1, [0.3, 0.8]));
        assert!(matches!(
            bad_sum.predict(&cleveland_sample()),
            Err(CardiocheckError::Prediction(ClassifierError::Numerical(_)))
        ));

        let nan = service(StubClassifier::returning(1, [f64::NAN, 1.0]));
        assert!(nan.predict(&cleveland_sample()).is_err());

        let negative = service(StubClassifier::returning(1, [-0.5, 1.5]));
        assert!(negative.predict(&cleveland_sample()).is_err());
    }

    #[test]
    fn test_tolerates_rounding_in_probability_sum() {
        let svc = service(StubClassifier::returning(0, [0.7, 0.3 + 1e-9]));
        assert!(svc.predict(&cleveland_sample()).is_ok());
    }

    #[test]
    fn test_disagreeing_label_is_kept() {
        let svc = service(StubClassifier::returning(0, [0.4, 0.6]));
        let result = svc.predict(&cleveland_sample()).expect("should predict");
        assert_eq!(result.label, 0);
        assert!((result.p_disease - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unavailable_model() {
        let svc: PredictionService<StubClassifier> =
            PredictionService::unavailable("Error loading the model: missing file");
        assert!(!svc.is_ready());
        assert_eq!(svc.load_error(), Some("Error loading the model: missing file"));

        let err = svc.predict(&cleveland_sample()).expect_err("must fail");
        assert!(matches!(err, CardiocheckError::ModelNotLoaded(_)));
        assert!(err.to_string().contains("missing file"));
    }

    #[test]
    fn test_from_load_result_keeps_load_error() {
        let loaded = DecisionTreeClassifier::load(Path::new("does/not/exist.json"));
        let svc = PredictionService::from_load_result(loaded);
        assert!(!svc.is_ready());
        let reason = svc.load_error().expect("load error");
        assert!(reason.starts_with("Error loading the model"));
    }

    #[test]
    fn test_end_to_end_with_bundled_model() {
        let svc = PredictionService::from_load_result(DecisionTreeClassifier::load(Path::new(
            "models",
        )));
        assert!(svc.is_ready());

        let result = svc.predict(&cleveland_sample()).expect("should predict");
        assert_eq!(result.label, 0);
        assert!((result.p_no_disease - 0.88).abs() < 1e-12);
        assert!((result.p_no_disease + result.p_disease - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_classifier_called_once_per_method() {
        let stub = Arc::new(StubClassifier::returning(1, [0.2, 0.8]));
        let svc = PredictionService::new(stub.clone());
        svc.predict(&cleveland_sample()).expect("should predict");
        assert_eq!(stub.calls.load(Ordering::SeqCst), 2);
    }
}
