use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum RouteError {
    /// Missing or malformed request parameters.
    InvalidInput(String),
    /// A route endpoint that is not a node of the graph.
    InvalidEndpoint(String),
    /// A congestion-aware route was requested before any forecast.
    ForecastNotLoaded,
    NoPath { source: String, target: String },
    DeadlineExceeded,
}

impl Display for RouteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteError::InvalidInput(reason) => write!(f, "{reason}"),
            RouteError::InvalidEndpoint(id) => write!(f, "invalid source/target: unknown node {id}"),
            RouteError::ForecastNotLoaded => write!(f, "forecast not loaded; call /forecast first"),
            RouteError::NoPath { source, target } => {
                write!(f, "no path from {source} to {target}")
            }
            RouteError::DeadlineExceeded => write!(f, "route search exceeded its deadline"),
        }
    }
}

impl std::error::Error for RouteError {}
