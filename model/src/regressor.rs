use ndarray::{Array1, ArrayView2};

use crate::Result;

/// A fitted regression model.
///
/// A `Regressor` maps each row of a feature matrix to a single scalar. It
/// does not:
/// - own or know the names of its features,
/// - validate the meaning of its inputs,
/// - mutate itself during prediction.
pub trait Regressor: Send + Sync {
    /// Returns the amount of features each input row must have.
    fn n_features(&self) -> usize;

    /// Predicts one output per row of `x`.
    ///
    /// # Arguments
    /// * `x` - A `(rows, n_features)` matrix.
    ///
    /// # Errors
    /// Returns `ModelErr::SizeMismatch` if `x` does not have `n_features` columns.
    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>>;
}
