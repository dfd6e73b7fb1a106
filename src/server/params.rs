use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_qs::Config;

/// Extractor for `serde_qs` query strings. A missing query string
/// deserializes as an empty one.
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = crate::Error;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();

        let config = Config::default();
        let params: T = config
            .deserialize_str(query)
            .map_err(|err| crate::Error::InvalidQuery(err.to_string()))?;

        Ok(QueryParams(params))
    }
}

/// Raw `/forecast` parameters, validated by
/// [`ForecastKey::parse`](crate::forecast::ForecastKey::parse).
#[derive(Debug, Default, Deserialize)]
pub struct ForecastParams {
    pub hour: Option<String>,
    pub day_of_week: Option<String>,
    pub is_peak: Option<String>,
    pub use_cache: Option<String>,
}

impl ForecastParams {
    /// Only an explicit `false` bypasses the cache.
    pub fn use_cache(&self) -> bool {
        !self
            .use_cache
            .as_deref()
            .is_some_and(|value| value.trim().eq_ignore_ascii_case("false"))
    }
}

/// Raw `/route` parameters, validated by
/// [`RouteRequest::parse`](crate::route::RouteRequest::parse).
#[derive(Debug, Default, Deserialize)]
pub struct RouteParams {
    pub source: Option<String>,
    pub target: Option<String>,
    pub mode: Option<String>,
    pub k: Option<String>,
}
