pub mod artifacts;
pub mod config;
pub mod error;
pub mod features;
pub mod prediction;
pub mod request;
pub mod service;

pub use artifacts::Artifacts;
pub use config::ServiceConfig;
pub use error::{ArtifactErr, ConfigErr, PredictErr};
pub use features::{FeatureSchema, FeatureVector};
pub use prediction::{PredictionResponse, predict};
pub use request::PredictionRequest;
