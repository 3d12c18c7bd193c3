//! Decision tree adapter: Implementation of `Classifier` over an exported tree.
//!
//! The artifact is the JSON dump of a fitted binary decision tree, using the
//! parallel-array layout of scikit-learn's `tree_` attribute:
//!
//! ```json
//! {
//!   "feature_names": ["age", "sex", ...],
//!   "classes": [0, 1],
//!   "children_left":  [1, -1, -1],
//!   "children_right": [2, -1, -1],
//!   "feature":        [11, -2, -2],
//!   "threshold":      [0.5, -2.0, -2.0],
//!   "value":          [[60, 40], [50, 10], [10, 30]]
//! }
//! ```
//!
//! A node whose `children_left` is `-1` is a leaf. Internal nodes send a sample
//! left when `x[feature] <= threshold`. Leaf `value` rows hold per-class weights.
//!
//! The whole structure is validated once at load time; afterwards the adapter
//! is immutable and shared between submissions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use crate::ports::{Classifier, ClassifierError};

/// File name looked up when the configured model path is a directory.
pub const DEFAULT_MODEL_FILE: &str = "heart_decision_tree.json";

/// `children_left`/`children_right` value marking a leaf.
const LEAF: i64 = -1;

/// Errors raised while loading a model artifact.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read model artifact {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid model artifact format: {0}")]
    Format(#[from] serde_json::Error),

    #[error("incompatible model schema: {0}")]
    Schema(String),

    #[error("malformed decision tree: {0}")]
    Structure(String),
}

/// Tree parameters as exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedDecisionTree {
    pub feature_names: Vec<String>,
    pub classes: Vec<u8>,
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        weights: [f64; 2],
    },
}

/// Binary decision tree classifier.
#[derive(Debug, Clone)]
pub struct DecisionTreeClassifier {
    nodes: Vec<Node>,
}

impl DecisionTreeClassifier {
    /// Load a tree from a JSON artifact.
    ///
    /// `path` may name the file itself or a directory containing
    /// [`DEFAULT_MODEL_FILE`].
    ///
    /// # Errors
    /// Returns error if the file cannot be read, is not valid JSON, or does not
    /// describe a well-formed tree over the expected feature schema.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let model_path = if path.is_dir() {
            path.join(DEFAULT_MODEL_FILE)
        } else {
            path.to_path_buf()
        };

        let content = fs::read_to_string(&model_path).map_err(|source| ModelError::Io {
            path: model_path.clone(),
            source,
        })?;
        let export: ExportedDecisionTree = serde_json::from_str(&content)?;
        let tree = Self::from_export(export)?;

        tracing::info!(
            "Loaded decision tree from {:?} (nodes={}, leaves={}, depth={})",
            model_path,
            tree.n_nodes(),
            tree.n_leaves(),
            tree.depth()
        );

        Ok(tree)
    }

    /// Build a tree from exported parameters, validating its structure.
    ///
    /// # Errors
    /// Returns `ModelError::Schema` if feature names or classes do not match,
    /// and `ModelError::Structure` for inconsistent node arrays.
    pub fn from_export(export: ExportedDecisionTree) -> Result<Self, ModelError> {
        if export.feature_names.len() != FEATURE_COUNT
            || export
                .feature_names
                .iter()
                .zip(FEATURE_NAMES)
                .any(|(got, want)| got != want)
        {
            return Err(ModelError::Schema(format!(
                "expected feature columns {:?}, got {:?}",
                FEATURE_NAMES, export.feature_names
            )));
        }
        if export.classes != [0u8, 1] {
            return Err(ModelError::Schema(format!(
                "expected classes [0, 1], got {:?}",
                export.classes
            )));
        }

        let n = export.children_left.len();
        if n == 0 {
            return Err(ModelError::Structure("tree has no nodes".into()));
        }
        if export.children_right.len() != n
            || export.feature.len() != n
            || export.threshold.len() != n
            || export.value.len() != n
        {
            return Err(ModelError::Structure(
                "node array lengths do not match".into(),
            ));
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let left = export.children_left[i];
            let right = export.children_right[i];

            if left == LEAF || right == LEAF {
                if left != right {
                    return Err(ModelError::Structure(format!(
                        "node {i} has exactly one child"
                    )));
                }
                let row = &export.value[i];
                let weights: [f64; 2] = row.as_slice().try_into().map_err(|_| {
                    ModelError::Structure(format!(
                        "leaf {i} has {} class weights, expected 2",
                        row.len()
                    ))
                })?;
                if weights.iter().any(|w| !w.is_finite()) {
                    return Err(ModelError::Structure(format!(
                        "leaf {i} has non-finite class weights"
                    )));
                }
                nodes.push(Node::Leaf { weights });
                continue;
            }

            let left = child_index(i, left, n)?;
            let right = child_index(i, right, n)?;
            let feature = usize::try_from(export.feature[i])
                .ok()
                .filter(|&f| f < FEATURE_COUNT)
                .ok_or_else(|| {
                    ModelError::Structure(format!(
                        "node {i} splits on feature {} outside 0..{FEATURE_COUNT}",
                        export.feature[i]
                    ))
                })?;
            let threshold = export.threshold[i];
            if !threshold.is_finite() {
                return Err(ModelError::Structure(format!(
                    "node {i} has a non-finite threshold"
                )));
            }

            nodes.push(Node::Split {
                feature,
                threshold,
                left,
                right,
            });
        }

        Ok(Self { nodes })
    }

    /// Total number of nodes.
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Length of the longest root-to-leaf path, in edges.
    #[must_use]
    pub fn depth(&self) -> usize {
        // Children always point forward, so a single reverse pass suffices.
        let mut depths = vec![0usize; self.nodes.len()];
        for (i, node) in self.nodes.iter().enumerate().rev() {
            if let Node::Split { left, right, .. } = node {
                depths[i] = 1 + depths[*left].max(depths[*right]);
            }
        }
        depths[0]
    }

    /// Walk the tree for one sample and return the reached leaf's weights.
    fn leaf_weights(&self, features: &FeatureVector) -> Result<[f64; 2], ClassifierError> {
        let x = features.to_array();
        if let Some(pos) = x.iter().position(|v| !v.is_finite()) {
            return Err(ClassifierError::InvalidInput(format!(
                "feature {} is not a finite number",
                FEATURE_NAMES[pos]
            )));
        }

        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(Node::Leaf { weights }) => return Ok(*weights),
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(ClassifierError::Internal(format!(
                        "node index {idx} out of range"
                    )))
                }
            }
        }
    }
}

/// Validate a child pointer. Children must point strictly forward.
fn child_index(parent: usize, child: i64, n: usize) -> Result<usize, ModelError> {
    usize::try_from(child)
        .ok()
        .filter(|&c| c > parent && c < n)
        .ok_or_else(|| {
            ModelError::Structure(format!(
                "node {parent} has invalid child index {child} (tree has {n} nodes)"
            ))
        })
}

fn normalize(weights: [f64; 2]) -> Result<[f64; 2], ClassifierError> {
    if weights.iter().any(|w| *w < 0.0) {
        return Err(ClassifierError::Numerical(
            "leaf has negative class weights".into(),
        ));
    }
    let total = weights[0] + weights[1];
    if total <= 0.0 {
        return Err(ClassifierError::Numerical(
            "leaf class weights sum to zero".into(),
        ));
    }
    Ok([weights[0] / total, weights[1] / total])
}

impl Classifier for DecisionTreeClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<u8, ClassifierError> {
        let proba = normalize(self.leaf_weights(features)?)?;
        // Ties go to the lower class index.
        Ok(if proba[1] > proba[0] { 1 } else { 0 })
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], ClassifierError> {
        normalize(self.leaf_weights(features)?)
    }
}
