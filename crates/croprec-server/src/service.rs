//! Prediction service: the loaded model bound to request handling

use croprec_core::{Error, Label, PredictionRequest, Result};
use croprec_model::{load_model, Predictor};
use std::path::Path;
use tracing::debug;

/// Owns the single predictor for the lifetime of the process
pub struct PredictionService {
    predictor: Box<dyn Predictor>,
}

impl PredictionService {
    /// Wrap an already constructed predictor
    pub fn new(predictor: impl Predictor + 'static) -> Self {
        Self {
            predictor: Box::new(predictor),
        }
    }

    /// Load the artifact at `path`; fails if it is missing, corrupt or invalid
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let model = load_model(path)?;
        debug!(
            "Model ready: {} classes, features [{}]",
            model.classes().len(),
            model.schema().names().join(", ")
        );

        Ok(Self::new(model))
    }

    /// The wrapped predictor
    pub fn predictor(&self) -> &dyn Predictor {
        self.predictor.as_ref()
    }

    /// Validate the request and predict every row, in row order
    pub fn predict_all(&self, request: &PredictionRequest) -> Result<Vec<Label>> {
        let table = self.predictor.schema().validate(request)?;
        let labels = self.predictor.predict(&table)?;

        if labels.len() != table.n_rows() {
            return Err(Error::prediction(format!(
                "predictor returned {} labels for {} rows",
                labels.len(),
                table.n_rows()
            )));
        }

        Ok(labels)
    }

    /// Predict every row and keep only the first row's label.
    ///
    /// Trailing rows are still validated and predicted; their labels are
    /// dropped. Use [`Self::predict_all`] to keep them.
    pub fn predict_first(&self, request: &PredictionRequest) -> Result<Label> {
        let labels = self.predict_all(request)?;

        if labels.len() > 1 {
            debug!(
                "Discarding {} trailing predictions from multi-row request",
                labels.len() - 1
            );
        }

        labels
            .into_iter()
            .next()
            .ok_or_else(|| Error::prediction("predictor returned no labels"))
    }
}
