//! HTTP client for the station listing

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::listing::{parse_listing, Listing};
use fuelscope_catalog::{RecordSource, StationRecord, WireSchema};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Fetches the station listing with retry and exponential backoff.
#[derive(Clone)]
pub struct StationsClient {
    inner: Client,
    config: Arc<ClientConfig>,
    schema: Arc<WireSchema>,
}

impl StationsClient {
    /// Create a new client configured from environment variables
    pub fn new() -> ApiResult<Self> {
        Self::with_config(ClientConfig::from_env())
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("fuelscope/", env!("CARGO_PKG_VERSION"))),
        );

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        let schema = WireSchema::from(config.schema);

        Ok(Self {
            inner,
            config: Arc::new(config),
            schema: Arc::new(schema),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch and decode the full listing
    #[instrument(skip(self), fields(url = %self.config.url))]
    pub async fn fetch_listing(&self) -> ApiResult<Listing> {
        let request_id = Uuid::new_v4().to_string();
        let start = Instant::now();

        let body = self.execute_with_retry(&request_id).await?;
        let listing = parse_listing(&body, &self.schema)?;

        info!(
            request_id = %request_id,
            records = listing.records.len(),
            skipped = listing.skipped,
            published = listing.date.as_deref().unwrap_or("unknown"),
            elapsed_ms = start.elapsed().as_millis(),
            "Fetched station listing"
        );
        Ok(listing)
    }

    /// Execute the GET with retry logic, returning the body text
    async fn execute_with_retry(&self, request_id: &str) -> ApiResult<String> {
        let retry_config = &self.config.retry;
        let mut last_error: Option<ApiError> = None;

        for attempt in 0..retry_config.max_attempts {
            // Wait before retry (except first attempt)
            if attempt > 0 {
                let delay = retry_config.delay_for_attempt(attempt);
                debug!(
                    request_id = %request_id,
                    attempt = attempt,
                    delay_ms = delay.as_millis(),
                    "Retrying after delay"
                );
                tokio::time::sleep(delay).await;
            }

            match self.execute_single_request(request_id).await {
                Ok(body) => {
                    debug!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        bytes = body.len(),
                        "Request succeeded"
                    );
                    return Ok(body);
                }
                Err(e) if e.is_retryable() && attempt + 1 < retry_config.max_attempts => {
                    debug!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        error = %e,
                        "Request failed, will retry"
                    );
                    last_error = Some(e);
                }
                Err(e) if e.is_retryable() => {
                    last_error = Some(e);
                }
                Err(e) => {
                    debug!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        error = %e,
                        "Request failed, not retrying"
                    );
                    return Err(e);
                }
            }
        }

        Err(ApiError::RetriesExhausted {
            attempts: retry_config.max_attempts,
            last_error: last_error.map_or_else(|| "Unknown error".to_string(), |e| e.to_string()),
        })
    }

    /// Execute a single request without retry
    async fn execute_single_request(&self, request_id: &str) -> ApiResult<String> {
        let response = self
            .inner
            .get(&self.config.url)
            .header(X_REQUEST_ID, request_id)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        self.handle_response(response).await
    }

    /// Read the body of a successful response
    async fn handle_response(&self, response: Response) -> ApiResult<String> {
        let status = response.status();

        if status.is_success() {
            response.text().await.map_err(|e| self.classify(e))
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(ApiError::api_response(status.as_u16(), message))
        }
    }

    fn classify(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout(self.config.timeout)
        } else {
            ApiError::Request(error)
        }
    }
}

impl RecordSource for StationsClient {
    type Error = ApiError;

    async fn fetch_stations(&self) -> Result<Vec<StationRecord>, ApiError> {
        Ok(self.fetch_listing().await?.records)
    }
}
