//! HTTP client for the netventory daemon

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use netventory_api::{
    requests::{AddDeviceRequest, IngestRequest},
    responses::{DeviceResponse, ErrorResponse, HealthResponse, IngestReportResponse, StatusResponse},
};

use crate::error::{ClientError, Result};

/// HTTP client for communicating with the netventory daemon
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
}

impl HttpClient {
    /// Create a new HTTP client
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid.
    ///
    /// # Example
    /// ```no_run
    /// use netventory_client::HttpClient;
    ///
    /// let client = HttpClient::new("http://localhost:8080")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    /// Create a new HTTP client with custom `reqwest::Client`
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid.
    pub fn with_client(base_url: impl AsRef<str>, client: Client) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        Ok(Self { client, base_url })
    }

    /// Create a client whose requests give up after `timeout`
    ///
    /// Bulk runs can take minutes; size the timeout for the largest list.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the client cannot be built.
    pub fn with_timeout(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(base_url, client)
    }

    /// Build a full URL from a fixed path
    fn url(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(ClientError::Url)
    }

    /// Build a URL from a fixed prefix and one percent-encoded segment
    fn url_with_segment(&self, prefix: &[&str], segment: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidResponse(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(prefix)
            .push(segment);
        Ok(url)
    }

    /// Turn a non-success response into `ClientError::Api`
    async fn check(response: Response) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        Err(ClientError::Api { status, message })
    }

    /// Perform a GET request and deserialize the response
    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.client.get(url).send().await.map_err(ClientError::from_reqwest)?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Perform a POST request with JSON body
    async fn post<T: DeserializeOwned>(&self, url: Url, body: impl serde::Serialize) -> Result<T> {
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Perform a DELETE request
    async fn delete<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.client.delete(url).send().await.map_err(ClientError::from_reqwest)?;
        Ok(Self::check(response).await?.json().await?)
    }

    // System endpoints

    /// Get daemon health status
    ///
    /// # Errors
    /// Returns an error if the request fails or the daemon returns an error.
    pub async fn health(&self) -> Result<HealthResponse> {
        self.get(self.url("/health")?).await
    }

    // Device endpoints

    /// List every device in the inventory
    ///
    /// # Errors
    /// Returns an error if the request fails or the daemon returns an error.
    ///
    /// # Example
    /// ```no_run
    /// # use netventory_client::HttpClient;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = HttpClient::new("http://localhost:8080")?;
    /// for device in client.list_devices().await? {
    ///     println!("{} {} {}", device.hostname, device.ip, device.device_type);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_devices(&self) -> Result<Vec<DeviceResponse>> {
        self.get(self.url("/api/devices")?).await
    }

    /// Get one device by hostname
    ///
    /// # Errors
    /// Returns `ClientError::Api` with status 404 if the device is unknown.
    pub async fn get_device(&self, hostname: &str) -> Result<DeviceResponse> {
        self.get(self.url_with_segment(&["api", "devices"], hostname)?)
            .await
    }

    /// Probe `ip` and add the device to the inventory
    ///
    /// # Errors
    /// Returns `ClientError::Api` with status 409 if the device is already
    /// present and 502 if it could not be reached.
    pub async fn add_device(&self, hostname: &str, ip: &str) -> Result<StatusResponse> {
        let body = AddDeviceRequest { ip: ip.to_string() };
        self.post(self.url_with_segment(&["api", "add"], hostname)?, body)
            .await
    }

    /// Remove a device from the inventory
    ///
    /// # Errors
    /// Returns `ClientError::Api` with status 404 if the device is unknown.
    pub async fn delete_device(&self, hostname: &str) -> Result<StatusResponse> {
        self.delete(self.url_with_segment(&["api", "delete"], hostname)?)
            .await
    }

    // Bulk ingestion

    /// Ingest a device list file stored on the daemon host
    ///
    /// # Errors
    /// Returns an error if the request fails or the daemon returns an error.
    pub async fn populate_from_file(&self, device_filename: &str) -> Result<IngestReportResponse> {
        self.get(self.url_with_segment(&["api", "populatedb"], device_filename)?)
            .await
    }

    /// Ingest the given addresses
    ///
    /// # Errors
    /// Returns an error if the request fails or the daemon returns an error.
    ///
    /// # Example
    /// ```no_run
    /// # use netventory_client::HttpClient;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = HttpClient::new("http://localhost:8080")?;
    /// let report = client
    ///     .populate(vec!["192.168.1.1".to_string(), "192.168.1.2".to_string()])
    ///     .await?;
    /// println!("{} added", report.success.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn populate(&self, addresses: Vec<String>) -> Result<IngestReportResponse> {
        self.post(self.url("/api/populate")?, IngestRequest { addresses })
            .await
    }
}
