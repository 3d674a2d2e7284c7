//! On-disk model artifact format

use crate::forest::RandomForest;
use crate::predictor::{Estimator, LoadedModel};
use crate::tree::{DecisionTree, TreeSpec};
use croprec_core::{Error, FeatureSpec, InputSchema, Label, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Artifact format version this build understands
pub const FORMAT_VERSION: u32 = 1;

/// Serialized model: schema, classes and estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,

    /// Model name
    #[serde(default = "default_name")]
    pub name: String,

    /// Input features in training order
    pub features: Vec<FeatureSpec>,

    /// Class labels, indexed by the estimator's class weights
    pub classes: Vec<Label>,

    pub estimator: EstimatorSpec,
}

/// Estimator section of an artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EstimatorSpec {
    DecisionTree { tree: TreeSpec },
    RandomForest { trees: Vec<TreeSpec> },
}

fn default_name() -> String {
    "model".to_string()
}

impl ModelArtifact {
    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Validate the artifact and build the in-memory model
    pub fn into_model(self) -> Result<LoadedModel> {
        if self.format_version != FORMAT_VERSION {
            return Err(Error::artifact(format!(
                "unsupported format version {} (expected {})",
                self.format_version, FORMAT_VERSION
            )));
        }

        let schema = InputSchema::new(self.features)
            .map_err(|e| Error::artifact(format!("invalid feature list: {}", e)))?;

        if self.classes.is_empty() {
            return Err(Error::artifact("artifact declares no classes"));
        }
        {
            let mut seen = HashSet::new();
            if let Some(dup) = self.classes.iter().find(|c| !seen.insert(*c)) {
                return Err(Error::artifact(format!("class '{}' declared twice", dup)));
            }
        }

        let n_features = schema.len();
        let n_classes = self.classes.len();

        let estimator = match self.estimator {
            EstimatorSpec::DecisionTree { tree } => {
                Estimator::DecisionTree(DecisionTree::from_spec(tree, n_features, n_classes)?)
            }
            EstimatorSpec::RandomForest { trees } => {
                let trees = trees
                    .into_iter()
                    .enumerate()
                    .map(|(i, spec)| {
                        DecisionTree::from_spec(spec, n_features, n_classes)
                            .map_err(|e| match e {
                                Error::Artifact(msg) => Error::artifact(format!("tree {}: {}", i, msg)),
                                other => other,
                            })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Estimator::RandomForest(RandomForest::new(trees)?)
            }
        };

        Ok(LoadedModel::new(self.name, schema, self.classes, estimator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Predictor;
    use croprec_core::PredictionRequest;
    use serde_json::json;

    fn artifact_json() -> serde_json::Value {
        json!({
            "format_version": 1,
            "name": "soil-moisture",
            "features": [{"name": "moisture"}, {"name": "clay", "kind": "integer"}],
            "classes": ["dry", "wet"],
            "estimator": {
                "type": "random_forest",
                "trees": [{
                    "children_left": [1, -1, -1],
                    "children_right": [2, -1, -1],
                    "feature": [0, -2, -2],
                    "threshold": [30.0, -2.0, -2.0],
                    "value": [[5, 5], [5, 0], [0, 5]]
                }]
            }
        })
    }

    #[test]
    fn test_json_artifact() {
        let model = ModelArtifact::from_json(&artifact_json().to_string())
            .unwrap()
            .into_model()
            .unwrap();

        assert_eq!(model.name(), "soil-moisture");
        assert_eq!(model.schema().len(), 2);
        assert_eq!(model.estimator().kind(), "random_forest");

        let request: PredictionRequest =
            serde_json::from_value(json!({"moisture": [10.0, 55.0], "clay": [3, 3]})).unwrap();
        let table = model.schema().validate(&request).unwrap();
        assert_eq!(
            model.predict(&table).unwrap(),
            vec![Label::text("dry"), Label::text("wet")]
        );
    }

    #[test]
    fn test_yaml_artifact() {
        let yaml = r#"
format_version: 1
features:
  - name: depth
classes: [1, 2]
estimator:
  type: decision_tree
  tree:
    children_left: [-1]
    children_right: [-1]
    feature: [-2]
    threshold: [-2.0]
    value: [[0.0, 2.0]]
"#;
        let model = ModelArtifact::from_yaml(yaml).unwrap().into_model().unwrap();

        assert_eq!(model.name(), "model");
        assert_eq!(model.classes(), &[Label::Integer(1), Label::Integer(2)]);
    }

    #[test]
    fn test_unsupported_version() {
        let mut value = artifact_json();
        value["format_version"] = json!(2);
        let err = ModelArtifact::from_json(&value.to_string())
            .unwrap()
            .into_model()
            .unwrap_err();
        assert!(err.to_string().contains("format version"));
    }

    #[test]
    fn test_duplicate_classes() {
        let mut value = artifact_json();
        value["classes"] = json!(["dry", "dry"]);
        let result = ModelArtifact::from_json(&value.to_string())
            .unwrap()
            .into_model();
        assert!(matches!(result, Err(Error::Artifact(_))));
    }

    #[test]
    fn test_duplicate_features() {
        let mut value = artifact_json();
        value["features"] = json!([{"name": "moisture"}, {"name": "moisture"}]);
        let result = ModelArtifact::from_json(&value.to_string())
            .unwrap()
            .into_model();
        assert!(matches!(result, Err(Error::Artifact(_))));
    }

    #[test]
    fn test_bad_tree_names_index() {
        let mut value = artifact_json();
        value["estimator"]["trees"][0]["feature"] = json!([7, -2, -2]);
        let err = ModelArtifact::from_json(&value.to_string())
            .unwrap()
            .into_model()
            .unwrap_err();
        assert!(err.to_string().contains("tree 0"));
    }

    #[test]
    fn test_unknown_estimator_type() {
        let mut value = artifact_json();
        value["estimator"]["type"] = json!("gradient_boosting");
        assert!(ModelArtifact::from_json(&value.to_string()).is_err());
    }
}
