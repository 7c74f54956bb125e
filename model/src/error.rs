use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

use safetensors::SafeTensorError;

/// The result type used in the entire model module.
pub type Result<T> = std::result::Result<T, ModelErr>;

/// The model module's error type.
#[derive(Debug)]
pub enum ModelErr {
    /// The artifact could not be read.
    Io(io::Error),
    /// The artifact is not a valid safetensors buffer.
    Format(SafeTensorError),
    MissingTensor(&'static str),
    UnsupportedDtype {
        tensor: &'static str,
        dtype: String,
    },
    BadShape {
        tensor: &'static str,
        shape: Vec<usize>,
    },
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    /// The model produced NaN or an infinity.
    NonFinite(f64),
}

impl Display for ModelErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelErr::Io(e) => write!(f, "io error: {e}"),
            ModelErr::Format(e) => write!(f, "invalid model artifact: {e}"),
            ModelErr::MissingTensor(name) => {
                write!(f, "model artifact has no `{name}` tensor")
            }
            ModelErr::UnsupportedDtype { tensor, dtype } => {
                write!(f, "tensor `{tensor}` has unsupported dtype {dtype}")
            }
            ModelErr::BadShape { tensor, shape } => {
                write!(f, "tensor `{tensor}` has unexpected shape {shape:?}")
            }
            ModelErr::SizeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "size mismatch for {what}: got {got}, expected {expected}"
            ),
            ModelErr::NonFinite(value) => write!(f, "model produced a non-finite value: {value}"),
        }
    }
}

impl Error for ModelErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ModelErr::Io(e) => Some(e),
            ModelErr::Format(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ModelErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<SafeTensorError> for ModelErr {
    fn from(value: SafeTensorError) -> Self {
        Self::Format(value)
    }
}
