use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::forecast::ForecastError;

/// Identifies a congestion scenario.
///
/// Keys compare exactly: two hours that differ in any bit are two
/// different scenarios, however close they are numerically.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ForecastKey {
    hour: f64,
    day_of_week: u8,
    is_peak: bool,
}

impl ForecastKey {
    pub const DEFAULT_HOUR: f64 = 9.0;
    pub const DEFAULT_DAY_OF_WEEK: u8 = 1;
    pub const DEFAULT_IS_PEAK: bool = true;

    /// `hour` must lie in `[0, 24)` and `day_of_week` in `0..=6`.
    pub fn new(hour: f64, day_of_week: u8, is_peak: bool) -> Result<Self, ForecastError> {
        if !hour.is_finite() || !(0.0..24.0).contains(&hour) {
            return Err(ForecastError::InvalidKey(format!(
                "hour must be a number in [0, 24), given {hour}"
            )));
        }

        if day_of_week > 6 {
            return Err(ForecastError::InvalidKey(format!(
                "day_of_week must be between 0 and 6, given {day_of_week}"
            )));
        }

        Ok(ForecastKey {
            // -0.0 and 0.0 name the same hour
            hour: hour + 0.0,
            day_of_week,
            is_peak,
        })
    }

    /// Builds a key from raw textual parameters. Absent parameters take
    /// their defaults, present ones must parse.
    pub fn parse(
        hour: Option<&str>,
        day_of_week: Option<&str>,
        is_peak: Option<&str>,
    ) -> Result<Self, ForecastError> {
        let invalid = || ForecastError::InvalidKey("invalid hour/day_of_week/is_peak".to_string());

        let hour = match hour {
            Some(value) => value.trim().parse::<f64>().map_err(|_| invalid())?,
            None => Self::DEFAULT_HOUR,
        };

        let day_of_week = match day_of_week {
            Some(value) => value.trim().parse::<u8>().map_err(|_| invalid())?,
            None => Self::DEFAULT_DAY_OF_WEEK,
        };

        let is_peak = match is_peak {
            Some(value) => parse_flag(value).ok_or_else(invalid)?,
            None => Self::DEFAULT_IS_PEAK,
        };

        ForecastKey::new(hour, day_of_week, is_peak)
    }

    #[inline]
    pub fn hour(&self) -> f64 {
        self.hour
    }

    #[inline]
    pub fn day_of_week(&self) -> u8 {
        self.day_of_week
    }

    #[inline]
    pub fn is_peak(&self) -> bool {
        self.is_peak
    }
}

/// Accepts `0`/`1` as well as `true`/`false`.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

impl Default for ForecastKey {
    fn default() -> Self {
        ForecastKey {
            hour: Self::DEFAULT_HOUR,
            day_of_week: Self::DEFAULT_DAY_OF_WEEK,
            is_peak: Self::DEFAULT_IS_PEAK,
        }
    }
}

impl PartialEq for ForecastKey {
    fn eq(&self, other: &Self) -> bool {
        self.hour.to_bits() == other.hour.to_bits()
            && self.day_of_week == other.day_of_week
            && self.is_peak == other.is_peak
    }
}

impl Eq for ForecastKey {}

impl Hash for ForecastKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hour.to_bits().hash(state);
        self.day_of_week.hash(state);
        self.is_peak.hash(state);
    }
}

impl Display for ForecastKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "hour={} day_of_week={} is_peak={}",
            self.hour, self.day_of_week, self.is_peak
        )
    }
}
