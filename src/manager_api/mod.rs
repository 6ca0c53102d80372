mod errors;

use std::time::Duration;
use async_trait::async_trait;
use log::debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode, Url};
use crate::config::Config;
use crate::models::WeatherRecord;
use crate::worker::Forward;

pub use errors::{ApiError, ForwardError};

const WEATHER_PATH: &str = "/api/weather";

/// Struct for handing weather records over to the storage API
pub struct WeatherApi {
    client: Client,
    url: Url,
}

impl WeatherApi {
    /// Returns a WeatherApi ready for posting weather records
    ///
    /// # Arguments
    ///
    /// * 'config' - configuration to use
    pub fn new(config: &Config) -> Result<WeatherApi, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let url = weather_url(&config.api_url)?;

        Ok(WeatherApi { client, url })
    }

    /// The endpoint weather records are posted to
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Forward for WeatherApi {
    /// Posts the record as JSON, only `201 Created` counts as stored
    ///
    /// # Arguments
    ///
    /// * 'record' - the weather record to store
    async fn forward(&self, record: &WeatherRecord) -> Result<(), ForwardError> {
        let body = record.to_vec()?;

        let response = self.client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        debug!("API responded {} for {}", status, record.city);

        if status != StatusCode::CREATED {
            return Err(ForwardError::Status(status.as_u16()));
        }

        Ok(())
    }
}

/// Joins the API base url with the weather endpoint path
///
/// # Arguments
///
/// * 'api_url' - base url of the storage API, with or without trailing slash
fn weather_url(api_url: &str) -> Result<Url, ApiError> {
    let joined = format!("{}{}", api_url.trim_end_matches('/'), WEATHER_PATH);

    Url::parse(&joined)
        .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", joined, e)))
}
