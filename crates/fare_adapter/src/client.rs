//! The prediction capability the gate depends on.
//!
//! Production wires in [`crate::http::HttpPredictionClient`]; tests use
//! [`StaticPredictionClient`], which never touches the network.

use crate::error::{PredictError, Result};
use crate::types::ModelName;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

#[async_trait]
pub trait PredictionClient: Send + Sync {
    /// Score `instances` against `model`, one prediction per instance.
    async fn predict(&self, model: &ModelName, instances: Vec<Value>) -> Result<Vec<Value>>;
}

/// One recorded call against a [`StaticPredictionClient`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: ModelName,
    pub instances: Vec<Value>,
}

#[derive(Debug, Clone)]
enum Canned {
    Predictions(Vec<Value>),
    Error(String),
}

/// Canned prediction client: answers every call the same way and records
/// what it was asked.
#[derive(Debug)]
pub struct StaticPredictionClient {
    canned: Canned,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StaticPredictionClient {
    /// Always returns `predictions`.
    pub fn returning(predictions: Vec<Value>) -> Self {
        Self {
            canned: Canned::Predictions(predictions),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always fails as if the service answered with an `error` field.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            canned: Canned::Error(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PredictionClient for StaticPredictionClient {
    async fn predict(&self, model: &ModelName, instances: Vec<Value>) -> Result<Vec<Value>> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                model: model.clone(),
                instances,
            });
        }
        match &self.canned {
            Canned::Predictions(p) => Ok(p.clone()),
            Canned::Error(msg) => Err(PredictError::Upstream(msg.clone())),
        }
    }
}
