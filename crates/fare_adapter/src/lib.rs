//! Fare adapter: the boundary between the gate and a remote model server.
//!
//! ```text
//! fare_gate handler
//!   │  RideParams as JSON instance
//!   ▼
//! PredictionClient::predict(model, [instance])
//!   │  (IO boundary: HTTP client in production, static client in tests)
//!   ▼
//! Vec<prediction>  ──►  first_prediction()
//! ```

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::{PredictionClient, RecordedCall, StaticPredictionClient};
pub use error::PredictError;
#[cfg(feature = "http")]
pub use http::HttpPredictionClient;
pub use types::{first_prediction, ModelName, PredictRequest, PredictResponse};
