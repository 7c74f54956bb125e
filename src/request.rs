//! Parse-and-validate step turning a loosely typed JSON body into a
//! `PredictionRequest`.
//!
//! Numeric fields accept numbers, numeric strings and booleans. Coercion
//! runs before the presence check, so a present but unparsable field is
//! reported as such even when another field is missing.

use serde_json::{Map, Value};

use crate::error::PredictErr;

/// A validated prediction request.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    pub location: String,
    pub total_sqft: f64,
    pub bath: i64,
    pub bhk: i64,
}

impl PredictionRequest {
    /// Parses and validates a raw request body.
    ///
    /// # Arguments
    /// * `body` - The raw bytes of the HTTP body.
    ///
    /// # Errors
    /// * `PredictErr::NoInput` if the body is empty or a falsy JSON value.
    /// * `PredictErr::MissingFields` if a field is absent, zero or empty.
    /// * `PredictErr::Parse` if the body isn't a JSON object or a field can't
    ///   be coerced.
    pub fn from_json(body: &[u8]) -> Result<Self, PredictErr> {
        if body.trim_ascii().is_empty() {
            return Err(PredictErr::NoInput);
        }

        let value: Value = serde_json::from_slice(body)?;
        if is_falsy(&value) {
            return Err(PredictErr::NoInput);
        }

        let Value::Object(fields) = value else {
            return Err(PredictErr::Parse(format!(
                "expected a JSON object, got {}",
                kind(&value)
            )));
        };

        Self::from_fields(&fields)
    }

    fn from_fields(fields: &Map<String, Value>) -> Result<Self, PredictErr> {
        let location = fields.get("location").filter(|v| !is_falsy(v));
        let total_sqft = coerce_float("total_sqft", fields.get("total_sqft"))?;
        let bath = coerce_int("bath", fields.get("bath"))?;
        let bhk = coerce_int("bhk", fields.get("bhk"))?;

        let Some(location) = location else {
            return Err(PredictErr::MissingFields);
        };
        if total_sqft == 0.0 || bath == 0 || bhk == 0 {
            return Err(PredictErr::MissingFields);
        }

        let Value::String(location) = location else {
            return Err(PredictErr::Parse(format!(
                "location must be a string, got {}",
                kind(location)
            )));
        };

        Ok(Self {
            location: location.clone(),
            total_sqft,
            bath,
            bhk,
        })
    }
}

/// Returns whether a JSON value counts as "not provided".
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Coerces a field to a finite float. Absent fields are zero.
fn coerce_float(field: &'static str, value: Option<&Value>) -> Result<f64, PredictErr> {
    let Some(value) = value else {
        return Ok(0.0);
    };

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(PredictErr::Parse(format!(
            "could not convert {field} to a number: {value}"
        ))),
    }
}

/// Coerces a field to an integer, truncating floats toward zero and
/// saturating at the `i64` bounds. Absent fields are zero.
fn coerce_int(field: &'static str, value: Option<&Value>) -> Result<i64, PredictErr> {
    let Some(value) = value else {
        return Ok(0);
    };

    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|v| v.is_finite())
                .map(|v| v.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    };

    parsed.ok_or_else(|| {
        PredictErr::Parse(format!("could not convert {field} to an integer: {value}"))
    })
}
