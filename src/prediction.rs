use log::debug;
use model::ModelErr;
use serde::{Deserialize, Serialize};

use crate::{artifacts::Artifacts, error::PredictErr, request::PredictionRequest};

/// Decimal digits kept in a returned price.
pub const PRICE_DECIMALS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(rename = "Price")]
    pub price: f64,
}

/// Encodes a request, runs the model on it and rounds the result.
///
/// # Errors
/// Returns `PredictErr::Model` if the model rejects the vector or yields a
/// non-finite price.
pub fn predict(
    artifacts: &Artifacts,
    request: &PredictionRequest,
) -> Result<PredictionResponse, PredictErr> {
    let vector = artifacts.schema().encode(request);
    let output = artifacts.model().predict(vector.as_row())?;

    let Some(&raw) = output.first() else {
        return Err(PredictErr::Model(ModelErr::SizeMismatch {
            what: "predictions",
            got: 0,
            expected: 1,
        }));
    };

    let price = round_to(raw, PRICE_DECIMALS);
    debug!(
        location = request.location.as_str(),
        known_location = vector.location().is_some(),
        price = price;
        "predicted price"
    );

    Ok(PredictionResponse { price })
}

/// Rounds to `decimals` digits using the correctly rounded decimal
/// representation, so that rounding a rounded value is a no-op.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}
