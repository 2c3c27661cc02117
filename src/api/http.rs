use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::BookingApi;
use crate::config::AppConfig;
use crate::errors::{ApiError, ConfigError};
use crate::models::envelope::ErrorBody;
use crate::models::{
    Booking, BookingId, BookingPayload, CancelReceipt, Envelope, ListQuery, StatusSummary,
};

pub struct HttpBookingApi {
    base_url: Url,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpBookingApi {
    pub fn new(config: &AppConfig) -> Result<Self, ConfigError> {
        let parsed = Url::parse(&config.api_url).map_err(|e| ConfigError::BaseUrl {
            url: config.api_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(ConfigError::BaseUrl {
                url: config.api_url.clone(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ConfigError::Client)?;

        let mut base_url = parsed;
        if let Ok(mut segments) = base_url.path_segments_mut() {
            segments.pop_if_empty();
        }

        Ok(Self {
            base_url,
            token: config.api_token.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Base URL plus `segments`, each percent-encoded as a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        tracing::debug!(%method, %url, "booking api request");

        let req = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Sends the request and returns the raw body of a 2xx response. Non-2xx
    /// responses are mapped to [`ApiError::Validation`] (422) or
    /// [`ApiError::Status`].
    async fn execute(&self, req: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.bytes().await?.to_vec();

        if status.is_success() {
            return Ok(body);
        }

        let error: ErrorBody = serde_json::from_slice(&body).unwrap_or_default();
        tracing::warn!(%status, message = ?error.message, "booking api returned error");

        if status == StatusCode::UNPROCESSABLE_ENTITY {
            if let Some(errors) = error.errors {
                return Err(ApiError::Validation {
                    errors,
                    message: error.message,
                });
            }
        }

        Err(ApiError::Status {
            status,
            message: error.message,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let body = self.execute(req).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn list(&self, query: &ListQuery) -> Result<Envelope<Vec<Booking>>, ApiError> {
        let req = self
            .request(Method::GET, &["bookings"])
            .query(&query.params());
        self.fetch(req).await
    }

    async fn get(&self, id: &BookingId) -> Result<Booking, ApiError> {
        let req = self.request(Method::GET, &["bookings", id.as_str()]);
        let env: Envelope<Booking> = self.fetch(req).await?;
        Ok(env.data)
    }

    async fn create(&self, payload: &BookingPayload) -> Result<Booking, ApiError> {
        let req = self.request(Method::POST, &["bookings"]).json(payload);
        let env: Envelope<Booking> = self.fetch(req).await?;
        tracing::info!(id = %env.data.id, "booking created");
        Ok(env.data)
    }

    async fn update(&self, id: &BookingId, payload: &BookingPayload) -> Result<Booking, ApiError> {
        let req = self
            .request(Method::PUT, &["bookings", id.as_str()])
            .json(payload);
        let env: Envelope<Booking> = self.fetch(req).await?;
        tracing::info!(id = %id, "booking updated");
        Ok(env.data)
    }

    async fn cancel(&self, id: &BookingId) -> Result<CancelReceipt, ApiError> {
        let req = self.request(Method::DELETE, &["bookings", id.as_str()]);
        let body = self.execute(req).await?;
        tracing::info!(id = %id, "booking cancelled");

        // 204 No Content carries no message
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(CancelReceipt::default());
        }
        Ok(serde_json::from_slice(&body)?)
    }

    async fn status_summary(&self) -> Result<StatusSummary, ApiError> {
        let req = self.request(Method::GET, &["get-bookings-status"]);
        let env: Envelope<serde_json::Map<String, serde_json::Value>> = self.fetch(req).await?;
        Ok(StatusSummary::from_map(env.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> AppConfig {
        AppConfig {
            api_url: url.to_string(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let api = HttpBookingApi::new(&config("http://localhost:8000/api/")).unwrap();
        assert_eq!(api.base_url(), "http://localhost:8000/api");
    }

    #[test]
    fn test_ids_stay_in_one_path_segment() {
        let api = HttpBookingApi::new(&config("http://localhost:8000/api/")).unwrap();
        assert_eq!(
            api.endpoint(&["bookings", "7"]).as_str(),
            "http://localhost:8000/api/bookings/7"
        );
        assert_eq!(
            api.endpoint(&["bookings", "7?force=1"]).as_str(),
            "http://localhost:8000/api/bookings/7%3Fforce=1"
        );
        assert_eq!(
            api.endpoint(&["bookings", "7/../8"]).as_str(),
            "http://localhost:8000/api/bookings/7%2F..%2F8"
        );
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(matches!(
            HttpBookingApi::new(&config("not a url")),
            Err(ConfigError::BaseUrl { .. })
        ));
        assert!(matches!(
            HttpBookingApi::new(&config("ftp://example.com")),
            Err(ConfigError::BaseUrl { .. })
        ));
    }
}
