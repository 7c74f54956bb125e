use std::{fmt, fs, path::Path};

use log::info;
use model::{LinearRegression, Regressor};

use crate::{
    error::ArtifactErr,
    features::{ColumnsFile, FeatureSchema},
};

/// The static artifacts the service runs on, loaded once and never mutated.
pub struct Artifacts {
    model: Box<dyn Regressor>,
    schema: FeatureSchema,
}

impl Artifacts {
    /// Pairs a model with the schema it was fitted against.
    ///
    /// # Errors
    /// Returns `ArtifactErr::SchemaMismatch` if the model's input width differs
    /// from the schema length.
    pub fn new<R>(model: R, schema: FeatureSchema) -> Result<Self, ArtifactErr>
    where
        R: Regressor + 'static,
    {
        if model.n_features() != schema.len() {
            return Err(ArtifactErr::SchemaMismatch {
                model: model.n_features(),
                schema: schema.len(),
            });
        }

        Ok(Self {
            model: Box::new(model),
            schema,
        })
    }

    /// Loads the model and columns artifacts from disk.
    ///
    /// # Arguments
    /// * `model_path` - A safetensors linear model.
    /// * `columns_path` - A JSON document of shape `{"data_columns": [...]}`.
    ///
    /// # Errors
    /// Returns an `ArtifactErr` if either file is missing, malformed, or the two
    /// don't agree on the amount of features.
    pub fn load(model_path: &Path, columns_path: &Path) -> Result<Self, ArtifactErr> {
        info!("loading model from {}", model_path.display());
        let model = LinearRegression::load(model_path).map_err(|source| ArtifactErr::Model {
            path: model_path.to_path_buf(),
            source,
        })?;

        info!("loading columns from {}", columns_path.display());
        let schema = load_schema(columns_path)?;

        info!(
            estimator = model.estimator().unwrap_or("unknown"),
            columns = schema.len(),
            locations = schema.locations().len();
            "artifacts loaded"
        );
        Self::new(model, schema)
    }

    pub fn model(&self) -> &dyn Regressor {
        self.model.as_ref()
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }
}

impl fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifacts")
            .field("n_features", &self.model.n_features())
            .field("schema", &self.schema)
            .finish()
    }
}

/// Reads the `{"data_columns": [...]}` document.
pub fn load_schema(path: &Path) -> Result<FeatureSchema, ArtifactErr> {
    let raw = fs::read(path).map_err(|source| ArtifactErr::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let file: ColumnsFile = serde_json::from_slice(&raw).map_err(|source| ArtifactErr::Schema {
        path: path.to_path_buf(),
        source,
    })?;

    FeatureSchema::new(file.data_columns)
}
