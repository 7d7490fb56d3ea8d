//! Oracle reached through a remote gateway's `/solve` endpoint.

use crate::gateway::{ErrorResponse, SolveResponse};
use async_trait::async_trait;
use std::time::Duration;
use strictly_connect_four::{
    FormatError, MoveRequest, MoveResult, Oracle, OracleError, ProcessError, SentinelTable,
    classify_reply, encode,
};
use tracing::{debug, info, instrument, warn};

/// Type-safe client for a running gateway.
///
/// A `400` from the gateway is a `FormatError`; any other failure status
/// is a `ProcessError`.
#[derive(Debug, Clone)]
pub struct HttpOracle {
    base_url: String,
    client: reqwest::Client,
    sentinels: SentinelTable,
    timeout: Duration,
}

impl HttpOracle {
    /// Creates a client for the gateway at `base_url`.
    #[instrument(skip_all, fields(base_url = %base_url.as_ref()))]
    pub fn new(base_url: impl AsRef<str>, sentinels: SentinelTable, timeout: Duration) -> Self {
        info!("Creating HTTP oracle client");
        Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            sentinels,
            timeout,
        }
    }

    /// URL queried for `request`.
    pub fn solve_url(&self, request: &MoveRequest) -> String {
        format!(
            "{}/solve/{}/{}?num_try={}",
            self.base_url,
            encode(request.board()),
            request.side().token(),
            request.budget()
        )
    }
}

#[async_trait]
impl Oracle for HttpOracle {
    #[instrument(skip(self, request), fields(side = %request.side()))]
    async fn request(&self, request: &MoveRequest) -> Result<MoveResult, OracleError> {
        let url = self.solve_url(request);
        debug!(url = %url, "Querying gateway");

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Gateway unreachable");
                ProcessError::new(format!("gateway request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let reason = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error,
                Err(_) => status.to_string(),
            };
            warn!(status = %status, reason = %reason, "Gateway rejected request");
            if status == reqwest::StatusCode::BAD_REQUEST {
                return Err(FormatError::new(format!("gateway rejected request: {}", reason)).into());
            }
            return Err(ProcessError::new(format!("gateway returned {}: {}", status, reason)).into());
        }

        let body: SolveResponse = response
            .json()
            .await
            .map_err(|e| ProcessError::new(format!("malformed gateway response: {}", e)))?;

        Ok(classify_reply(&body.stdout, &self.sentinels)?)
    }
}
