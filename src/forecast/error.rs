use std::fmt::{Display, Formatter};

use crate::impl_err;

/// A forecast request that cannot name a valid scenario.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastError {
    InvalidKey(String),
}

/// The flow model failed, or answered something the cache cannot store.
#[derive(Debug)]
pub enum PredictorError {
    LengthMismatch { expected: usize, got: usize },
    NonFinite { edge: String, value: f64 },
    Model(String),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl Display for ForecastError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ForecastError::InvalidKey(reason) => write!(f, "invalid forecast key: {reason}"),
        }
    }
}

impl std::error::Error for ForecastError {}

impl Display for PredictorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PredictorError::LengthMismatch { expected, got } => write!(
                f,
                "predictor returned {got} values for {expected} feature rows"
            ),
            PredictorError::NonFinite { edge, value } => {
                write!(f, "predictor returned {value} for edge {edge}")
            }
            PredictorError::Model(reason) => write!(f, "flow model error: {reason}"),
            PredictorError::Io(err) => write!(f, "unable to read flow model: {err}"),
            PredictorError::Json(err) => write!(f, "malformed flow model: {err}"),
        }
    }
}

impl std::error::Error for PredictorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PredictorError::Io(err) => Some(err),
            PredictorError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl_err!(std::io::Error, PredictorError, Io);
impl_err!(serde_json::Error, PredictorError, Json);
