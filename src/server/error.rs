use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use serde_json::json;

use crate::forecast::ForecastError;
use crate::route::RouteError;

impl crate::Error {
    pub fn status(&self) -> StatusCode {
        match self {
            crate::Error::Route(RouteError::NoPath { .. }) => StatusCode::NOT_FOUND,
            crate::Error::Route(RouteError::DeadlineExceeded) => StatusCode::GATEWAY_TIMEOUT,
            crate::Error::Route(_) => StatusCode::BAD_REQUEST,
            crate::Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            crate::Error::Forecast(ForecastError::InvalidKey(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for crate::Error {
    fn into_response(self) -> Response {
        let code = self.status();

        if code.is_server_error() {
            error!("Request failed with {code}: {self}");
        } else {
            warn!("Request rejected with {code}: {self}");
        }

        (code, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
