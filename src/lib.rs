#![doc = include_str!("../README.md")]

#[cfg(feature = "mimalloc")]
use mimalloc::MiMalloc;
#[cfg_attr(feature = "mimalloc", global_allocator)]
#[cfg(feature = "mimalloc")]
static GLOBAL: MiMalloc = MiMalloc;

use std::fmt::{Display, Formatter};

pub mod congestion;
pub mod forecast;
pub mod graph;
pub mod route;
#[cfg(feature = "http_server")]
pub mod server;
pub mod util;

use forecast::{ForecastError, PredictorError};
use graph::GraphError;
use route::RouteError;

#[derive(Debug)]
pub enum Error {
    Graph(GraphError),
    Forecast(ForecastError),
    Predictor(PredictorError),
    Route(RouteError),
    /// A request whose query string cannot be read at all.
    InvalidQuery(String),
    /// Missing or malformed process configuration.
    Config(String),
    /// A failure outside the engine, such as a panicked worker task.
    Internal(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Graph(err) => write!(f, "{err}"),
            Error::Forecast(err) => write!(f, "{err}"),
            Error::Predictor(err) => write!(f, "{err}"),
            Error::Route(err) => write!(f, "{err}"),
            Error::InvalidQuery(reason) => write!(f, "invalid query string: {reason}"),
            Error::Config(reason) => write!(f, "configuration error: {reason}"),
            Error::Internal(reason) => write!(f, "internal error: {reason}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Graph(err) => Some(err),
            Error::Forecast(err) => Some(err),
            Error::Predictor(err) => Some(err),
            Error::Route(err) => Some(err),
            Error::InvalidQuery(_) | Error::Config(_) | Error::Internal(_) => None,
        }
    }
}

impl_err!(GraphError, Graph);
impl_err!(ForecastError, Forecast);
impl_err!(PredictorError, Predictor);
impl_err!(RouteError, Route);

pub type Result<T> = std::result::Result<T, Error>;
