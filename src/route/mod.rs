//! Route search over the network graph.
//!
//! [`find_path`] and [`k_shortest_simple_paths`] work under any
//! [`EdgeCost`]. The [`Planner`] runs both under the congestion-penalized
//! and the plain distance costs to answer a [`RouteRequest`].
#[doc(hidden)]
pub mod cost;
#[doc(hidden)]
pub mod error;
#[doc(hidden)]
pub mod path;
#[doc(hidden)]
pub mod planner;
pub mod primitives;

#[doc(inline)]
pub use cost::{DistanceCost, EdgeCost, PenalizedCost};
#[doc(inline)]
pub use error::RouteError;
#[doc(inline)]
pub use path::Path;
#[doc(inline)]
pub use planner::{Coordinate, ForecastRef, Mode, Planner, RouteRequest, RouteResponse, RouteSummary};
#[doc(inline)]
pub use primitives::{find_path, k_shortest_simple_paths, Deadline};
