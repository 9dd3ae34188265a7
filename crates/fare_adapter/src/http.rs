//! HTTP prediction client for ML Engine-style `:predict` endpoints.
//!
//! `POST {endpoint}/v1/projects/{p}/models/{m}[/versions/{v}]:predict`
//! with body `{"instances": [...]}`. Failures come back either as a non-2xx
//! status or in-band as an `error` field; both are surfaced as
//! [`PredictError`].

#[cfg(feature = "http")]
use crate::error::{PredictError, Result};
use crate::types::ModelName;
#[cfg(feature = "http")]
use crate::types::{error_text, PredictRequest, PredictResponse};

/// Public ML Engine endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://ml.googleapis.com";

/// Full `:predict` URL for `model` under `endpoint`.
pub fn predict_url(endpoint: &str, model: &ModelName) -> String {
    format!(
        "{}/v1/{}:predict",
        endpoint.trim_end_matches('/'),
        model.resource()
    )
}

#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpPredictionClient {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    timeout_ms: Option<u64>,
}

#[cfg(feature = "http")]
impl HttpPredictionClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            token: None,
            timeout_ms: None,
        }
    }

    /// Bearer token sent with every call.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// No timeout unless set: a stalled upstream stalls the call.
    pub fn with_timeout_ms(mut self, timeout_ms: Option<u64>) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport_error(&self, e: reqwest::Error) -> PredictError {
        match (e.is_timeout(), self.timeout_ms) {
            (true, Some(timeout_ms)) => PredictError::Timeout { timeout_ms },
            _ => PredictError::Http(e.to_string()),
        }
    }
}

#[cfg(feature = "http")]
#[async_trait::async_trait]
impl crate::client::PredictionClient for HttpPredictionClient {
    async fn predict(
        &self,
        model: &ModelName,
        instances: Vec<serde_json::Value>,
    ) -> Result<Vec<serde_json::Value>> {
        let url = predict_url(&self.endpoint, model);
        let mut req = self.http.post(&url).json(&PredictRequest { instances });
        if let Some(tok) = &self.token {
            req = req.bearer_auth(tok);
        }
        if let Some(ms) = self.timeout_ms {
            req = req.timeout(std::time::Duration::from_millis(ms));
        }

        tracing::debug!(%url, "calling prediction service");
        let resp = req.send().await.map_err(|e| self.transport_error(e))?;
        let status = resp.status();
        let body = resp.bytes().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            // Prefer the service's own error message when it sent one.
            if let Ok(parsed) = serde_json::from_slice::<PredictResponse>(&body) {
                if let Some(err) = parsed.error {
                    return Err(PredictError::Upstream(error_text(&err)));
                }
            }
            return Err(PredictError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let parsed: PredictResponse = serde_json::from_slice(&body)?;
        parsed.into_predictions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_url_with_version() {
        let m = ModelName::new("proj", "taxifare", Some("v2".into()));
        assert_eq!(
            predict_url(DEFAULT_ENDPOINT, &m),
            "https://ml.googleapis.com/v1/projects/proj/models/taxifare/versions/v2:predict"
        );
    }

    #[test]
    fn predict_url_trims_trailing_slash() {
        let m = ModelName::new("proj", "taxifare", None);
        assert_eq!(
            predict_url("http://127.0.0.1:9000/", &m),
            "http://127.0.0.1:9000/v1/projects/proj/models/taxifare:predict"
        );
    }
}
