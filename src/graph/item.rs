use geo::Point;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The category of a network segment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum EdgeKind {
    Road,
    #[default]
    Path,
}

/// Reads `road` or `path` in any letter case.
impl TryFrom<String> for EdgeKind {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl EdgeKind {
    /// Flow capacity assumed when the source data leaves it blank.
    pub const fn default_capacity(&self) -> f64 {
        match self {
            EdgeKind::Road => 600.0,
            EdgeKind::Path => 400.0,
        }
    }
}

/// An intersection or point-of-interest.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    /// Position in degrees, `x` is longitude and `y` is latitude.
    pub position: Point<f64>,
    pub label: String,
}

impl Node {
    pub fn new(id: impl Into<String>, lat: f64, lon: f64, label: impl Into<String>) -> Self {
        Node {
            id: id.into(),
            position: Point::new(lon, lat),
            label: label.into(),
        }
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.position.y()
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.position.x()
    }
}

/// A path or road segment. The endpoints live in the graph structure,
/// an edge only carries its own attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: String,
    pub length_m: f64,
    pub capacity: f64,
    pub kind: EdgeKind,
}

impl Edge {
    /// The unpenalized routing weight, which is the segment length.
    #[inline]
    pub fn base_weight(&self) -> f64 {
        self.length_m
    }
}
