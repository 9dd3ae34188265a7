use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictError {
    /// The prediction service answered with an `error` field.
    #[error("upstream: {0}")]
    Upstream(String),

    #[error("http: {0}")]
    Http(String),

    #[error("status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("timeout: prediction call exceeded {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("prediction service returned no predictions")]
    EmptyPredictions,

    #[error("serde: {0}")]
    Serde(#[from] serde_json::Error),
}

impl PredictError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, PredictError::Timeout { .. })
    }

    /// True when the service itself rejected the instances, as opposed to the
    /// call never completing cleanly.
    pub fn is_reported(&self) -> bool {
        matches!(self, PredictError::Upstream(_) | PredictError::EmptyPredictions)
    }
}

pub type Result<T> = std::result::Result<T, PredictError>;
