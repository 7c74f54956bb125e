use std::{error::Error, fmt, io, path::PathBuf};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::{error, warn};
use model::ModelErr;
use serde_json::json;

/// Invalid process configuration, caught before loading anything.
#[derive(Debug)]
pub enum ConfigErr {
    InvalidPort(String),
}

impl fmt::Display for ConfigErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPort(value) => write!(f, "invalid PORT value: {value:?}"),
        }
    }
}

impl Error for ConfigErr {}

/// Startup failures. Any of these means the service can't become ready.
#[derive(Debug)]
pub enum ArtifactErr {
    /// An artifact could not be read from disk.
    Io { path: PathBuf, source: io::Error },
    /// The columns document is not `{"data_columns": [...]}`.
    Schema {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The schema lacks the positional numeric columns.
    TooFewColumns { got: usize },
    /// The model artifact could not be decoded.
    Model { path: PathBuf, source: ModelErr },
    /// The model was fitted against a different amount of features.
    SchemaMismatch { model: usize, schema: usize },
}

impl fmt::Display for ArtifactErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            Self::Schema { path, source } => {
                write!(f, "invalid columns file {}: {source}", path.display())
            }
            Self::TooFewColumns { got } => write!(
                f,
                "schema must start with total_sqft, bath and bhk columns, got {got} column(s)"
            ),
            Self::Model { path, source } => {
                write!(f, "invalid model artifact {}: {source}", path.display())
            }
            Self::SchemaMismatch { model, schema } => write!(
                f,
                "model expects {model} feature(s) but the schema has {schema} column(s)"
            ),
        }
    }
}

impl Error for ArtifactErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Schema { source, .. } => Some(source),
            Self::Model { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Per-request failures of `POST /predict`.
#[derive(Debug)]
pub enum PredictErr {
    /// The body is absent, empty or a falsy JSON value.
    NoInput,
    /// A required field is absent, zero or empty.
    MissingFields,
    /// The body or one of its fields could not be coerced.
    Parse(String),
    /// The model refused the feature vector or produced garbage.
    Model(ModelErr),
}

impl PredictErr {
    /// Returns the HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoInput | Self::MissingFields => StatusCode::BAD_REQUEST,
            Self::Parse(_) | Self::Model(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for PredictErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoInput => write!(f, "No input data provided"),
            Self::MissingFields => write!(f, "Missing required fields"),
            Self::Parse(msg) => write!(f, "{msg}"),
            Self::Model(e) => write!(f, "{e}"),
        }
    }
}

impl Error for PredictErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Model(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ModelErr> for PredictErr {
    fn from(value: ModelErr) -> Self {
        Self::Model(value)
    }
}

impl From<serde_json::Error> for PredictErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value.to_string())
    }
}

impl IntoResponse for PredictErr {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("prediction failed: {self}");
        } else {
            warn!("rejected prediction request: {self}");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_bad_requests() {
        assert_eq!(PredictErr::NoInput.status(), StatusCode::BAD_REQUEST);
        assert_eq!(PredictErr::MissingFields.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn everything_else_is_a_server_error() {
        let parse = PredictErr::Parse("bad".into());
        let model = PredictErr::Model(ModelErr::SizeMismatch {
            what: "features",
            got: 1,
            expected: 2,
        });

        assert_eq!(parse.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(model.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(model.to_string(), "size mismatch for features: got 1, expected 2");
    }
}
