//! Feature schema and one-hot encoding of prediction requests.

use ndarray::{Array1, ArrayView2, Axis};
use serde::Deserialize;

use crate::{error::ArtifactErr, request::PredictionRequest};

/// Amount of positional numeric columns: total_sqft, bath and bhk.
pub const NUMERIC_COLUMNS: usize = 3;

const TOTAL_SQFT: usize = 0;
const BATH: usize = 1;
const BHK: usize = 2;

/// On-disk shape of the columns artifact.
#[derive(Debug, Deserialize)]
pub(crate) struct ColumnsFile {
    pub data_columns: Vec<String>,
}

/// The ordered feature columns the model was fitted against.
///
/// Columns `0..3` are the numeric features by position, the rest are the
/// lower-cased location names of the one-hot block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl FeatureSchema {
    /// Creates a new `FeatureSchema`.
    ///
    /// # Errors
    /// Returns `ArtifactErr::TooFewColumns` if the numeric columns are missing.
    pub fn new(columns: Vec<String>) -> Result<Self, ArtifactErr> {
        if columns.len() < NUMERIC_COLUMNS {
            return Err(ArtifactErr::TooFewColumns { got: columns.len() });
        }

        Ok(Self { columns })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the location names of the one-hot block, in schema order.
    pub fn locations(&self) -> &[String] {
        &self.columns[NUMERIC_COLUMNS..]
    }

    /// Finds the schema index of a location, ignoring case.
    ///
    /// Only the one-hot block is searched; the numeric column names never
    /// match.
    pub fn location_index(&self, location: &str) -> Option<usize> {
        let location = location.to_lowercase();
        self.locations()
            .iter()
            .position(|column| *column == location)
            .map(|i| i + NUMERIC_COLUMNS)
    }

    /// Encodes a request as a dense feature vector aligned with this schema.
    ///
    /// An unknown location leaves the whole one-hot block at zero.
    pub fn encode(&self, request: &PredictionRequest) -> FeatureVector {
        let mut values = Array1::zeros(self.len());
        values[TOTAL_SQFT] = request.total_sqft;
        values[BATH] = request.bath as f64;
        values[BHK] = request.bhk as f64;

        let location = self.location_index(&request.location);
        if let Some(i) = location {
            values[i] = 1.0;
        }

        FeatureVector { values, location }
    }
}

/// A single encoded request.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Array1<f64>,
    location: Option<usize>,
}

impl FeatureVector {
    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Returns the index of the hot location column, if the location was known.
    pub fn location(&self) -> Option<usize> {
        self.location
    }

    /// Views the vector as a single-row matrix, the shape regressors consume.
    pub fn as_row(&self) -> ArrayView2<'_, f64> {
        self.values.view().insert_axis(Axis(0))
    }
}
