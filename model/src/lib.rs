mod error;
mod linear;
mod regressor;

pub use error::{ModelErr, Result};
pub use linear::LinearRegression;
pub use regressor::Regressor;
