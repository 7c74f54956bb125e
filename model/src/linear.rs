use std::{collections::HashMap, fs, path::Path};

use log::{debug, info};
use ndarray::{Array1, ArrayView2};
use safetensors::{Dtype, SafeTensors, tensor::TensorView};

use crate::{ModelErr, Regressor, Result};

const COEF: &str = "coef";
const INTERCEPT: &str = "intercept";
const ESTIMATOR: &str = "estimator";

/// Ordinary least squares model, `y = x · coef + intercept`.
///
/// Lasso and ridge fits share the same prediction function, so their
/// artifacts load into this type as well.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression {
    coef: Array1<f64>,
    intercept: f64,
    /// Name of the fitting algorithm, carried in the artifact header.
    estimator: Option<String>,
}

impl LinearRegression {
    /// Creates a new `LinearRegression` from already fitted parameters.
    ///
    /// # Arguments
    /// * `coef` - One coefficient per feature.
    /// * `intercept` - The bias term.
    pub fn new(coef: Array1<f64>, intercept: f64) -> Self {
        Self {
            coef,
            intercept,
            estimator: None,
        }
    }

    /// Tags the model with the name of the estimator that fitted it.
    pub fn with_estimator(mut self, estimator: impl Into<String>) -> Self {
        self.estimator = Some(estimator.into());
        self
    }

    pub fn estimator(&self) -> Option<&str> {
        self.estimator.as_deref()
    }

    /// Reads and decodes a safetensors model artifact from disk.
    ///
    /// # Errors
    /// Returns `ModelErr::Io` if the file can't be read, or any decoding error
    /// from `LinearRegression::from_safetensors`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::from_safetensors(&bytes)
    }

    /// Decodes a model from a safetensors buffer.
    ///
    /// The buffer must hold a `coef` tensor of shape `[n]` or `[1, n]` and an
    /// `intercept` tensor with a single element, both `F32` or `F64`. The
    /// optional `estimator` header metadata entry is kept.
    ///
    /// # Arguments
    /// * `bytes` - The raw artifact.
    ///
    /// # Returns
    /// The decoded model or the reason the artifact is invalid.
    pub fn from_safetensors(bytes: &[u8]) -> Result<Self> {
        let tensors = SafeTensors::deserialize(bytes)?;

        let (coef_shape, coef) = read_tensor(&tensors, COEF)?;
        if !matches!(coef_shape.as_slice(), [n] | [1, n] if *n > 0) {
            return Err(ModelErr::BadShape {
                tensor: COEF,
                shape: coef_shape,
            });
        }

        let (intercept_shape, intercept) = read_tensor(&tensors, INTERCEPT)?;
        let [intercept] = intercept.as_slice() else {
            return Err(ModelErr::BadShape {
                tensor: INTERCEPT,
                shape: intercept_shape,
            });
        };

        let (_, header) = SafeTensors::read_metadata(bytes)?;
        let estimator = header
            .metadata()
            .as_ref()
            .and_then(|meta| meta.get(ESTIMATOR).cloned());

        match &estimator {
            Some(name) => info!("decoded {name} model with {} coefficient(s)", coef.len()),
            None => debug!("decoded linear model with {} coefficient(s)", coef.len()),
        }

        Ok(Self {
            coef: Array1::from(coef),
            intercept: *intercept,
            estimator,
        })
    }

    /// Encodes this model as a safetensors buffer with `F64` tensors, writing
    /// the estimator name into the header metadata when set.
    ///
    /// # Errors
    /// Returns `ModelErr::Format` if serialization fails.
    pub fn to_safetensors(&self) -> Result<Vec<u8>> {
        let coef: Vec<u8> = self.coef.iter().flat_map(|v| v.to_le_bytes()).collect();
        let intercept = self.intercept.to_le_bytes();

        let tensors = [
            (COEF, TensorView::new(Dtype::F64, vec![self.coef.len()], &coef)?),
            (INTERCEPT, TensorView::new(Dtype::F64, vec![1], &intercept)?),
        ];

        let metadata = self
            .estimator
            .as_ref()
            .map(|name| HashMap::from([(ESTIMATOR.to_string(), name.clone())]));

        Ok(safetensors::serialize(tensors, &metadata)?)
    }
}

impl Regressor for LinearRegression {
    fn n_features(&self) -> usize {
        self.coef.len()
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.coef.len() {
            return Err(ModelErr::SizeMismatch {
                what: "features",
                got: x.ncols(),
                expected: self.coef.len(),
            });
        }

        let y = x.dot(&self.coef) + self.intercept;
        if let Some(&bad) = y.iter().find(|v| !v.is_finite()) {
            return Err(ModelErr::NonFinite(bad));
        }

        Ok(y)
    }
}

/// Reads a floating point tensor, widening it to `f64`.
///
/// # Returns
/// The tensor's shape and its values in row-major order.
fn read_tensor(tensors: &SafeTensors<'_>, name: &'static str) -> Result<(Vec<usize>, Vec<f64>)> {
    let view = tensors
        .tensor(name)
        .map_err(|_| ModelErr::MissingTensor(name))?;

    let values = match view.dtype() {
        Dtype::F64 => view.data().chunks_exact(8).map(le_f64).collect(),
        Dtype::F32 => view.data().chunks_exact(4).map(le_f32).collect(),
        dtype => {
            return Err(ModelErr::UnsupportedDtype {
                tensor: name,
                dtype: format!("{dtype:?}"),
            });
        }
    };

    Ok((view.shape().to_vec(), values))
}

fn le_f64(chunk: &[u8]) -> f64 {
    let mut buf = [0; 8];
    buf.copy_from_slice(chunk);
    f64::from_le_bytes(buf)
}

fn le_f32(chunk: &[u8]) -> f64 {
    let mut buf = [0; 4];
    buf.copy_from_slice(chunk);
    f64::from(f32::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use ndarray::{arr1, arr2};

    use super::*;

    fn f32_artifact(coef: &[f32], coef_shape: Vec<usize>, intercept: &[f32]) -> Vec<u8> {
        let coef: Vec<u8> = coef.iter().flat_map(|v| v.to_le_bytes()).collect();
        let intercept_bytes: Vec<u8> = intercept.iter().flat_map(|v| v.to_le_bytes()).collect();

        let tensors = [
            (COEF, TensorView::new(Dtype::F32, coef_shape, &coef).unwrap()),
            (
                INTERCEPT,
                TensorView::new(Dtype::F32, vec![intercept.len()], &intercept_bytes).unwrap(),
            ),
        ];

        safetensors::serialize(tensors, &None).unwrap()
    }

    #[test]
    fn predict_is_dot_product_plus_intercept() {
        let model = LinearRegression::new(arr1(&[0.5, 2.0, -1.0]), 10.0);
        let x = arr2(&[[2.0, 1.0, 3.0], [0.0, 0.0, 0.0]]);

        let y = model.predict(x.view()).unwrap();

        assert_eq!(y, arr1(&[10.0, 10.0]));
    }

    #[test]
    fn predict_rejects_wrong_width() {
        let model = LinearRegression::new(arr1(&[1.0, 1.0]), 0.0);
        let x = arr2(&[[1.0, 2.0, 3.0]]);

        let err = model.predict(x.view()).unwrap_err();

        assert!(matches!(
            err,
            ModelErr::SizeMismatch {
                got: 3,
                expected: 2,
                ..
            }
        ));
    }

    #[test]
    fn predict_rejects_overflow() {
        let model = LinearRegression::new(arr1(&[f64::MAX]), 0.0);
        let x = arr2(&[[2.0]]);

        let err = model.predict(x.view()).unwrap_err();

        assert!(matches!(err, ModelErr::NonFinite(v) if v.is_infinite()));
    }

    #[test]
    fn safetensors_artifact_restores_parameters() {
        let model = LinearRegression::new(arr1(&[0.1, 0.2, 0.3, 1.5]), -7.25);

        let bytes = model.to_safetensors().unwrap();
        let restored = LinearRegression::from_safetensors(&bytes).unwrap();

        assert_eq!(restored, model);
        assert_eq!(restored.n_features(), 4);
        assert_eq!(restored.estimator(), None);
    }

    #[test]
    fn estimator_travels_in_header_metadata() {
        let model = LinearRegression::new(arr1(&[1.0, 2.0]), 0.5).with_estimator("lasso");

        let bytes = model.to_safetensors().unwrap();
        let restored = LinearRegression::from_safetensors(&bytes).unwrap();

        assert_eq!(restored.estimator(), Some("lasso"));
        assert_eq!(restored, model);
    }

    #[test]
    fn f32_artifacts_are_widened() {
        let bytes = f32_artifact(&[1.5, -2.0], vec![1, 2], &[0.25]);

        let model = LinearRegression::from_safetensors(&bytes).unwrap();

        assert_eq!(model, LinearRegression::new(arr1(&[1.5, -2.0]), 0.25));
    }

    #[test]
    fn intercept_must_be_a_single_value() {
        let bytes = f32_artifact(&[1.0, 2.0], vec![2], &[1.0, 2.0]);

        let err = LinearRegression::from_safetensors(&bytes).unwrap_err();

        assert!(matches!(
            err,
            ModelErr::BadShape {
                tensor: INTERCEPT,
                ..
            }
        ));
    }

    #[test]
    fn missing_intercept_is_reported() {
        let coef: Vec<u8> = [1.0f64, 2.0].iter().flat_map(|v| v.to_le_bytes()).collect();
        let tensors = [(COEF, TensorView::new(Dtype::F64, vec![2], &coef).unwrap())];
        let bytes = safetensors::serialize(tensors, &None).unwrap();

        let err = LinearRegression::from_safetensors(&bytes).unwrap_err();

        assert!(matches!(err, ModelErr::MissingTensor(INTERCEPT)));
    }

    #[test]
    fn garbage_is_not_an_artifact() {
        let err = LinearRegression::from_safetensors(b"not a model").unwrap_err();

        assert!(matches!(err, ModelErr::Format(_)));
    }
}
