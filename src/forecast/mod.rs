//! Predicted edge flow for a congestion scenario.
//!
//! A [`ForecastKey`] names the scenario (hour, weekday, peak flag).
//! The [`ForecastCache`] turns a key into a [`ForecastTable`] by feeding
//! one [`FeatureRow`] per edge to a [`FlowPredictor`], keeps the table,
//! and remembers it as the active forecast for routing.
#[doc(hidden)]
pub mod cache;
#[doc(hidden)]
pub mod error;
#[doc(hidden)]
pub mod key;
#[doc(hidden)]
pub mod predictor;
#[doc(hidden)]
pub mod table;
#[doc(hidden)]
#[cfg(test)]
mod test;

#[doc(inline)]
pub use cache::ForecastCache;
#[doc(inline)]
pub use error::{ForecastError, PredictorError};
#[doc(inline)]
pub use key::{parse_flag, ForecastKey};
#[doc(inline)]
pub use predictor::{
    BaselinePredictor, FeatureBuilder, FeatureRow, FlowPredictor, LinearPredictor, FEATURES,
};
#[doc(inline)]
pub use table::{ForecastEntry, ForecastTable};
