//! Loading model artifacts from the local filesystem

use crate::artifact::ModelArtifact;
use crate::predictor::{LoadedModel, Predictor};
use croprec_core::{Error, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

/// Encoding of an artifact file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Json,
    Yaml,
}

impl ArtifactFormat {
    /// Pick the format from the file extension; anything not YAML is JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Read, decode and validate the artifact at `path`.
///
/// The file is closed before validation starts; the returned model holds no
/// handle on it.
pub fn load_model(path: impl AsRef<Path>) -> Result<LoadedModel> {
    let path = path.as_ref();
    let format = ArtifactFormat::from_path(path);
    debug!("Reading {:?} artifact from {}", format, path.display());

    let artifact = {
        let file = File::open(path).map_err(|e| {
            Error::artifact(format!("failed to open {}: {}", path.display(), e))
        })?;
        let reader = BufReader::new(file);

        match format {
            ArtifactFormat::Json => serde_json::from_reader::<_, ModelArtifact>(reader)
                .map_err(|e| Error::artifact(format!("failed to decode {}: {}", path.display(), e)))?,
            ArtifactFormat::Yaml => serde_yaml::from_reader::<_, ModelArtifact>(reader)
                .map_err(|e| Error::artifact(format!("failed to decode {}: {}", path.display(), e)))?,
        }
    };

    let model = artifact.into_model()?;

    info!(
        "Loaded model '{}' from {} ({}, {} features)",
        model.name(),
        path.display(),
        model.estimator().kind(),
        model.schema().len()
    );

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ArtifactFormat::from_path(&PathBuf::from("model.yaml")),
            ArtifactFormat::Yaml
        );
        assert_eq!(
            ArtifactFormat::from_path(&PathBuf::from("model.YML")),
            ArtifactFormat::Yaml
        );
        assert_eq!(
            ArtifactFormat::from_path(&PathBuf::from("model.json")),
            ArtifactFormat::Json
        );
        assert_eq!(
            ArtifactFormat::from_path(&PathBuf::from("crop_recommendation_model")),
            ArtifactFormat::Json
        );
    }

    #[test]
    fn test_missing_file() {
        let err = load_model("does/not/exist.json").unwrap_err();
        assert!(matches!(err, Error::Artifact(_)));
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
