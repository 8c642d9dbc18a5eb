//! HTTP client for the tariff backend.
//!
//! Wraps `reqwest` with typed list fetches and the calculate call. List
//! endpoints surface non-2xx answers as [`ClientError::UnexpectedStatus`];
//! the calculate endpoint surfaces them as the generic
//! [`ClientError::Calculation`] and logs the backend's reason instead.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tariffcalc_core::{AppConfig, CalculateTariffRequest, City, ServicePoint};

use crate::error::ClientError;
use crate::types::{DataEnvelope, QuoteEnvelope, TariffQuote};

const DEFAULT_USER_AGENT: &str = "tariffcalc/0.1 (tariff-calculator)";

const WAREHOUSES_PATH: &str = "api/warehouses";
const LOCKERS_PATH: &str = "api/lockers";
const CITIES_PATH: &str = "api/cities";
const CALCULATE_PATH: &str = "api/calculate-tariff";

/// Client for the tariff backend.
///
/// Use [`TariffClient::from_config`] in the binary or
/// [`TariffClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct TariffClient {
    client: Client,
    base_url: Url,
}

impl TariffClient {
    /// Builds a client from application config.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`ClientError::InvalidBaseUrl`] for a malformed URL.
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Self::with_user_agent(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a client with the default user agent.
    ///
    /// # Errors
    ///
    /// Same as [`TariffClient::from_config`].
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        Self::with_user_agent(base_url, timeout_secs, DEFAULT_USER_AGENT)
    }

    /// Creates a client with an explicit user agent.
    ///
    /// # Errors
    ///
    /// Same as [`TariffClient::from_config`].
    pub fn with_user_agent(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so `Url::join` appends below any path
        // prefix instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetches every warehouse (staffed office).
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ClientError::Deserialize`] if the body matches neither envelope.
    pub async fn fetch_warehouses(&self) -> Result<Vec<ServicePoint>, ClientError> {
        self.request_list(WAREHOUSES_PATH).await
    }

    /// Fetches every parcel locker.
    ///
    /// # Errors
    ///
    /// Same as [`TariffClient::fetch_warehouses`].
    pub async fn fetch_lockers(&self) -> Result<Vec<ServicePoint>, ClientError> {
        self.request_list(LOCKERS_PATH).await
    }

    /// Fetches the selectable cities.
    ///
    /// # Errors
    ///
    /// Same as [`TariffClient::fetch_warehouses`].
    pub async fn fetch_cities(&self) -> Result<Vec<City>, ClientError> {
        self.request_list(CITIES_PATH).await
    }

    /// Posts a validated request to the calculate endpoint.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Calculation`] on a non-2xx status.
    /// - [`ClientError::Deserialize`] if the body is not a quote.
    pub async fn calculate_tariff(
        &self,
        request: &CalculateTariffRequest,
    ) -> Result<TariffQuote, ClientError> {
        let url = self.endpoint(CALCULATE_PATH)?;
        let response = self.client.post(url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                tariff_type = %request.tariff_type,
                body = %body,
                "tariff calculation rejected"
            );
            return Err(ClientError::Calculation {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let envelope: QuoteEnvelope =
            serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
                context: format!("calculate-tariff({})", request.tariff_type),
                source: e,
            })?;
        Ok(envelope.into_quote())
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Sends a GET, asserts a 2xx status, and unwraps either list envelope.
    async fn request_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ClientError> {
        let url = self.endpoint(path)?;
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let envelope: DataEnvelope =
            serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;

        let items: Vec<T> = envelope.data.into_items(url.as_str());
        tracing::debug!(%url, count = items.len(), "fetched list");
        Ok(items)
    }
}
