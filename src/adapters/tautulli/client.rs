//! Tautulli HTTP client
//!
//! All commands are `GET {base_url}/api/v2?apikey=...&cmd=...` requests. The
//! service URL and API key are handed to the client at construction and never
//! read from anywhere else.
//!
//! The configured timeout bounds each API command as a whole. A download has
//! no overall deadline since export files can be large; it fails only when the
//! body stalls for longer than the timeout between chunks.

use super::api::TautulliApi;
use super::models::{ApiEnvelope, ExportsTable};
use crate::config::SecretString;
use crate::domain::{
    ApiResult, ExportId, ExportJobRecord, ExportRequest, ExporterError, Result, SectionId,
    TautulliError,
};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::time::Duration;

const API_PATH: &str = "/api/v2";

/// reqwest-backed implementation of [`TautulliApi`]
pub struct TautulliClient {
    /// Base URL of the Tautulli instance, without trailing slash
    base_url: String,

    /// Full endpoint (`{base_url}/api/v2`)
    endpoint: String,

    /// API key sent with every request
    api_key: SecretString,

    /// Deadline for API commands, idle limit for downloads
    timeout: Duration,

    client: Client,
}

impl TautulliClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: SecretString, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let endpoint = format!("{base_url}{API_PATH}");

        let client = ClientBuilder::new()
            .connect_timeout(timeout.min(Duration::from_secs(30)))
            .build()
            .map_err(|e| {
                ExporterError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url,
            endpoint,
            api_key,
            timeout,
            client,
        })
    }

    /// Full API endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Issue one API command and check the HTTP status
    ///
    /// `timeout` bounds the whole exchange, body included; `None` leaves only
    /// the connect timeout.
    async fn command(
        &self,
        cmd: &str,
        params: &[(&str, String)],
        timeout: Option<Duration>,
    ) -> ApiResult<Response> {
        tracing::debug!(cmd = cmd, endpoint = %self.endpoint, "Calling Tautulli API");

        let api_key: &str = self.api_key.expose_secret().as_ref();
        let mut request = self
            .client
            .get(&self.endpoint)
            .query(&[("apikey", api_key), ("cmd", cmd)])
            .query(params);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(cmd, e))?;

        check_status(response).await
    }

    /// Issue a command and decode the JSON envelope
    async fn command_json<T: DeserializeOwned>(
        &self,
        cmd: &str,
        params: &[(&str, String)],
    ) -> ApiResult<T> {
        let response = self.command(cmd, params, Some(self.timeout)).await?;
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                TautulliError::Timeout(format!("{cmd}: {e}"))
            } else {
                TautulliError::InvalidResponse(format!("{cmd}: {e}"))
            }
        })?;

        let envelope: ApiEnvelope<T> = serde_json::from_str(&body)
            .map_err(|e| TautulliError::InvalidResponse(format!("{cmd}: {e}")))?;

        if !envelope.response.is_success() {
            let message = envelope.response.message.unwrap_or_else(|| {
                format!("{cmd} returned result '{}'", envelope.response.result)
            });
            return Err(TautulliError::ApiError(message));
        }

        envelope
            .response
            .data
            .ok_or_else(|| TautulliError::InvalidResponse(format!("{cmd}: response has no data")))
    }
}

fn transport_error(cmd: &str, e: reqwest::Error) -> TautulliError {
    if e.is_timeout() {
        TautulliError::Timeout(format!("{cmd}: {e}"))
    } else {
        TautulliError::ConnectionFailed(format!("{cmd}: {e}"))
    }
}

/// Map non-2xx responses onto client/server errors
async fn check_status(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    if status.is_server_error() {
        Err(TautulliError::ServerError {
            status: status.as_u16(),
            message,
        })
    } else {
        Err(TautulliError::ClientError {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl TautulliApi for TautulliClient {
    async fn export_metadata(&self, request: &ExportRequest) -> ApiResult<()> {
        self.command("export_metadata", &request.query_params(), Some(self.timeout))
            .await
            .map(|_| ())
    }

    async fn get_exports_table(&self, section_id: SectionId) -> ApiResult<Vec<ExportJobRecord>> {
        let table: ExportsTable = self
            .command_json("get_exports_table", &[("section_id", section_id.to_string())])
            .await?;
        Ok(table.data)
    }

    async fn download_export(&self, export_id: ExportId) -> ApiResult<Vec<u8>> {
        let mut response = self
            .command("download_export", &[("export_id", export_id.to_string())], None)
            .await?;

        let mut artifact = Vec::new();
        loop {
            let chunk = tokio::time::timeout(self.timeout, response.chunk())
                .await
                .map_err(|_| {
                    TautulliError::Timeout(format!(
                        "download_export: no data received for {}s after {} bytes",
                        self.timeout.as_secs(),
                        artifact.len()
                    ))
                })?
                .map_err(|e| transport_error("download_export", e))?;

            match chunk {
                Some(bytes) => artifact.extend_from_slice(&bytes),
                None => break,
            }
        }

        tracing::debug!(export_id = %export_id, bytes = artifact.len(), "Downloaded export");
        Ok(artifact)
    }

    async fn delete_export(&self, export_id: ExportId) -> ApiResult<()> {
        self.command(
            "delete_export",
            &[("export_id", export_id.to_string())],
            Some(self.timeout),
        )
        .await
            .map(|_| ())
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let client = TautulliClient::new(
            "http://localhost:8181/",
            secret_string("key".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(client.base_url(), "http://localhost:8181");
        assert_eq!(client.endpoint(), "http://localhost:8181/api/v2");
    }

    #[test]
    fn test_endpoint_keeps_subpath() {
        let client = TautulliClient::new(
            "https://example.com/tautulli",
            secret_string("key".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(client.endpoint(), "https://example.com/tautulli/api/v2");
    }
}
