use crate::error::{PredictError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Fully qualified model coordinates on the prediction service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelName {
    pub project: String,
    pub model: String,
    /// Omitted from the resource path when unset (service default version).
    #[serde(default)]
    pub version: Option<String>,
}

impl ModelName {
    pub fn new(
        project: impl Into<String>,
        model: impl Into<String>,
        version: Option<String>,
    ) -> Self {
        Self {
            project: project.into(),
            model: model.into(),
            version,
        }
    }

    /// Resource path: `projects/{project}/models/{model}[/versions/{version}]`.
    pub fn resource(&self) -> String {
        let mut name = format!("projects/{}/models/{}", self.project, self.model);
        if let Some(version) = &self.version {
            name.push_str("/versions/");
            name.push_str(version);
        }
        name
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resource())
    }
}

/// Body of a `:predict` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub instances: Vec<Value>,
}

/// Body returned by a `:predict` call. The service reports failures in-band
/// through `error` rather than (only) through the HTTP status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub predictions: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl PredictResponse {
    /// Unwrap the predictions, turning an in-band `error` into `Upstream`.
    pub fn into_predictions(self) -> Result<Vec<Value>> {
        match self.error {
            Some(err) => Err(PredictError::Upstream(error_text(&err))),
            None => Ok(self.predictions),
        }
    }
}

/// Strings are reported bare, anything else as compact JSON.
pub(crate) fn error_text(err: &Value) -> String {
    match err {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| err.to_string()),
        other => other.to_string(),
    }
}

/// The caller only ever submits one instance, so only the first result matters.
pub fn first_prediction(predictions: Vec<Value>) -> Result<Value> {
    predictions
        .into_iter()
        .next()
        .ok_or(PredictError::EmptyPredictions)
}
