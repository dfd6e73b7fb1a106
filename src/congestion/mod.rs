//! Maps predicted load to a routing penalty.
//!
//! The penalty is a three-step table, not a smooth function of load:
//!
//! | load ratio      | level    | penalty |
//! |-----------------|----------|---------|
//! | `< 0.5`         | `Low`    | `0.0`   |
//! | `0.5 ..< 0.8`   | `Medium` | `0.3`   |
//! | `>= 0.8`        | `High`   | `0.7`   |
//!
//! The ratio is `predicted_flow / max(capacity, 1)`.


use serde::Serialize;
use strum::{Display, EnumString};

use crate::forecast::{ForecastEntry, ForecastTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CongestionLevel {
    Low,
    Medium,
    High,
}

impl CongestionLevel {
    pub const MEDIUM_RATIO: f64 = 0.5;
    pub const HIGH_RATIO: f64 = 0.8;

    pub fn from_ratio(ratio: f64) -> Self {
        if ratio < Self::MEDIUM_RATIO {
            CongestionLevel::Low
        } else if ratio < Self::HIGH_RATIO {
            CongestionLevel::Medium
        } else {
            CongestionLevel::High
        }
    }

    pub fn from_entry(entry: &ForecastEntry) -> Self {
        CongestionLevel::from_ratio(entry.ratio())
    }

    /// Dimensionless multiplier added on top of the base length.
    pub const fn penalty(&self) -> f64 {
        match self {
            CongestionLevel::Low => 0.0,
            CongestionLevel::Medium => 0.3,
            CongestionLevel::High => 0.7,
        }
    }
}

/// Penalty lookups against one forecast. Without a forecast, or for an
/// edge the forecast does not know, the penalty is zero.
#[derive(Debug, Clone, Copy)]
pub struct CongestionModel<'a> {
    forecast: Option<&'a ForecastTable>,
}

impl<'a> CongestionModel<'a> {
    pub fn new(forecast: Option<&'a ForecastTable>) -> Self {
        CongestionModel { forecast }
    }

    pub fn level(&self, edge_id: &str) -> Option<CongestionLevel> {
        self.forecast?.get(edge_id).map(CongestionLevel::from_entry)
    }

    #[inline]
    pub fn penalty(&self, edge_id: &str) -> f64 {
        self.level(edge_id).map_or(0.0, |level| level.penalty())
    }
}
