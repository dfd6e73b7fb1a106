//! HTTP transport over the routing engine.
//!
//! | route       | answers                                          |
//! |-------------|--------------------------------------------------|
//! | `/`         | graph summary and cache status                   |
//! | `/graph`    | every node and edge                              |
//! | `/forecast` | predicted flow per edge; makes the table active  |
//! | `/route`    | congestion-aware and shortest routes             |
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod error;
#[doc(hidden)]
pub mod handlers;
#[doc(hidden)]
pub mod params;
#[doc(hidden)]
pub mod state;
#[doc(hidden)]
#[cfg(test)]
mod test;

use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer, MaxAge};

#[doc(inline)]
pub use config::Config;
#[doc(inline)]
pub use handlers::FORECAST_VERSION_HEADER;
#[doc(inline)]
pub use params::{ForecastParams, QueryParams, RouteParams};
#[doc(inline)]
pub use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::status))
        .route("/graph", get(handlers::graph))
        .route("/forecast", get(handlers::forecast))
        .route("/route", get(handlers::route))
        .with_state(state)
}

pub fn cors(origins: &[String]) -> CorsLayer {
    CorsLayer::new()
        .allow_methods(vec![Method::GET])
        .allow_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .expose_headers(vec![header::HeaderName::from_static(FORECAST_VERSION_HEADER)])
        .allow_origin(AllowOrigin::list(
            origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok()),
        ))
        .max_age(MaxAge::exact(Duration::new(3600, 0)))
}
