//! Predictor trait and the in-memory model built from an artifact

use crate::forest::RandomForest;
use crate::tree::DecisionTree;
use croprec_core::{Error, FeatureTable, InputSchema, Label, Result};

/// Trait for anything that can label the rows of a feature table
pub trait Predictor: Send + Sync {
    /// Predict one label per row, in row order
    fn predict(&self, table: &FeatureTable) -> Result<Vec<Label>>;

    /// Input schema the table must satisfy
    fn schema(&self) -> &InputSchema;

    /// Get the model name
    fn name(&self) -> &str;
}

/// Estimator variants an artifact can carry
#[derive(Debug, Clone, PartialEq)]
pub enum Estimator {
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
}

impl Estimator {
    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DecisionTree(_) => "decision_tree",
            Self::RandomForest(_) => "random_forest",
        }
    }

    fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>> {
        match self {
            Self::DecisionTree(tree) => tree.predict_proba(row).map(<[f64]>::to_vec),
            Self::RandomForest(forest) => forest.predict_proba(row),
        }
    }
}

/// A model loaded from an artifact; immutable after construction
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModel {
    name: String,
    schema: InputSchema,
    classes: Vec<Label>,
    estimator: Estimator,
}

impl LoadedModel {
    /// Assemble a model from validated parts
    pub fn new(
        name: impl Into<String>,
        schema: InputSchema,
        classes: Vec<Label>,
        estimator: Estimator,
    ) -> Self {
        Self {
            name: name.into(),
            schema,
            classes,
            estimator,
        }
    }

    /// Class labels in probability order
    pub fn classes(&self) -> &[Label] {
        &self.classes
    }

    /// The underlying estimator
    pub fn estimator(&self) -> &Estimator {
        &self.estimator
    }

    /// Class probabilities for every row
    pub fn predict_proba(&self, table: &FeatureTable) -> Result<Vec<Vec<f64>>> {
        if table.columns() != self.schema.names().as_slice() {
            return Err(Error::prediction(format!(
                "table columns {:?} do not match model features {:?}",
                table.columns(),
                self.schema.names()
            )));
        }

        table
            .rows()
            .map(|row| self.estimator.predict_proba(row))
            .collect()
    }
}

impl Predictor for LoadedModel {
    fn predict(&self, table: &FeatureTable) -> Result<Vec<Label>> {
        self.predict_proba(table)?
            .iter()
            .map(|p| {
                argmax(p)
                    .and_then(|i| self.classes.get(i).cloned())
                    .ok_or_else(|| Error::prediction("estimator produced no class scores"))
            })
            .collect()
    }

    fn schema(&self) -> &InputSchema {
        &self.schema
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Index of the largest score; ties go to the lowest index
fn argmax(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeSpec;
    use croprec_core::FeatureSpec;

    fn model() -> LoadedModel {
        let schema =
            InputSchema::new(vec![FeatureSpec::float("x"), FeatureSpec::float("y")]).unwrap();
        let tree = DecisionTree::from_spec(
            TreeSpec {
                children_left: vec![1, -1, -1],
                children_right: vec![2, -1, -1],
                feature: vec![1, -2, -2],
                threshold: vec![0.5, -2.0, -2.0],
                value: vec![vec![1.0, 1.0], vec![5.0, 0.0], vec![1.0, 4.0]],
            },
            2,
            2,
        )
        .unwrap();

        LoadedModel::new(
            "toy",
            schema,
            vec![Label::text("wheat"), Label::text("jute")],
            Estimator::DecisionTree(tree),
        )
    }

    #[test]
    fn test_predict_each_row() {
        let model = model();
        let table = FeatureTable::from_rows(
            vec!["x".into(), "y".into()],
            vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![9.0, 0.5]],
        )
        .unwrap();

        let labels = model.predict(&table).unwrap();
        assert_eq!(
            labels,
            vec![Label::text("wheat"), Label::text("jute"), Label::text("wheat")]
        );
        assert_eq!(model.name(), "toy");
        assert_eq!(model.estimator().kind(), "decision_tree");
    }

    #[test]
    fn test_column_mismatch() {
        let table =
            FeatureTable::from_rows(vec!["y".into(), "x".into()], vec![vec![0.0, 0.0]]).unwrap();
        let err = model().predict(&table).unwrap_err();
        assert!(matches!(err, Error::Prediction(_)));
    }

    #[test]
    fn test_argmax_ties_first() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), Some(1));
        assert_eq!(argmax(&[0.5, 0.5]), Some(0));
        assert_eq!(argmax(&[]), None);
    }
}
