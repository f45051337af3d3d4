//! Thin wrappers over the three backend endpoints.
//!
//! One request per call, no retries. Non-2xx statuses and transport failures
//! come back as network errors; payloads that do not match the expected shape
//! come back as malformed responses.

use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    error::ClientError,
    model::{Coordinates, CurrentWeatherReading, ForecastPoint, Location, ReverseGeocode},
};

/// Relative to the backend base URL, so a path prefix on the base is kept.
pub const CURRENT_WEATHER_PATH: &str = "api/current-weather";
pub const FORECAST_PATH: &str = "api/forecast";
pub const REVERSE_GEOCODE_PATH: &str = "api/reverse-geocode";

#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    async fn current_weather(&self, location: &Location)
    -> Result<CurrentWeatherReading, ClientError>;

    /// An empty or `null` list is a valid, empty forecast.
    async fn forecast(&self, location: &Location) -> Result<Vec<ForecastPoint>, ClientError>;

    async fn reverse_geocode(&self, position: Coordinates) -> Result<ReverseGeocode, ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpWeatherClient {
    base_url: Url,
    http: Client,
}

impl HttpWeatherClient {
    /// `timeout` of `None` keeps the transport default.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut base_url =
            Url::parse(base_url).map_err(|_| ClientError::InvalidUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        // Without a trailing slash, joining would replace the last path segment.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Build)?;

        Ok(Self { base_url, http })
    }

    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        Self::new(&config.backend_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|_| ClientError::InvalidUrl(format!("{}{}", self.base_url, path)))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let url = self.endpoint(path)?;
        let url_str = url.to_string();
        tracing::debug!(url = %url_str, ?query, "Sending backend request");

        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url_str.clone(),
                source,
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| ClientError::Transport {
            url: url_str.clone(),
            source,
        })?;

        if !status.is_success() {
            tracing::debug!(url = %url_str, %status, body = %truncate_body(&body), "Backend request failed");
            return Err(ClientError::Status {
                url: url_str,
                status,
            });
        }

        serde_json::from_str(&body).map_err(|source| ClientError::MalformedResponse {
            url: url_str,
            source,
        })
    }
}

#[async_trait]
impl WeatherApi for HttpWeatherClient {
    async fn current_weather(
        &self,
        location: &Location,
    ) -> Result<CurrentWeatherReading, ClientError> {
        self.get_json(
            CURRENT_WEATHER_PATH,
            &[("location", location.as_str().to_string())],
        )
        .await
    }

    async fn forecast(&self, location: &Location) -> Result<Vec<ForecastPoint>, ClientError> {
        let points: Option<Vec<ForecastPoint>> = self
            .get_json(FORECAST_PATH, &[("location", location.as_str().to_string())])
            .await?;
        Ok(points.unwrap_or_default())
    }

    async fn reverse_geocode(&self, position: Coordinates) -> Result<ReverseGeocode, ClientError> {
        self.get_json(
            REVERSE_GEOCODE_PATH,
            &[
                ("lat", position.latitude.to_string()),
                ("lon", position.longitude.to_string()),
            ],
        )
        .await
    }
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_base_url() {
        let err = HttpWeatherClient::new("not a url", None).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[test]
    fn endpoints_join_onto_base() {
        let client = HttpWeatherClient::new("http://localhost:5000", None).unwrap();
        let url = client.endpoint(FORECAST_PATH).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/forecast");
    }

    #[test]
    fn endpoints_keep_base_path_prefix() {
        for base in ["http://host:5000/weather", "http://host:5000/weather/"] {
            let client = HttpWeatherClient::new(base, None).unwrap();
            let url = client.endpoint(CURRENT_WEATHER_PATH).unwrap();
            assert_eq!(url.as_str(), "http://host:5000/weather/api/current-weather");
        }
    }

    #[test]
    fn from_config_uses_backend_url() {
        let cfg = Config::default();
        let client = HttpWeatherClient::from_config(&cfg).unwrap();
        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:5000/");
    }

    #[test]
    fn truncate_long_bodies() {
        let long = "é".repeat(300);
        assert_eq!(truncate_body(&long).chars().count(), 200);
        assert_eq!(truncate_body("short"), "short");
    }
}
