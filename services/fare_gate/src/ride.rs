//! Ride parameters: query extraction, defaulting and numeric coercion.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Midtown Manhattan, used when a location is omitted.
pub const DEFAULT_LOCATION: Location = Location {
    latitude: 40.7808,
    longitude: -73.9772,
};

pub const DEFAULT_PASSENGER_COUNT: f64 = 1.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("{field}: expected \"lat,lon\", got {value:?}")]
    Location { field: &'static str, value: String },
    #[error("{field}: not a number: {value:?}")]
    Number { field: &'static str, value: String },
}

/// A `"lat,lon"` coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Components past the second are ignored.
    pub fn parse(field: &'static str, raw: &str) -> Result<Self, ParamError> {
        let mut parts = raw.split(',');
        let (lat, lon) = match (parts.next(), parts.next()) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                return Err(ParamError::Location {
                    field,
                    value: raw.to_string(),
                })
            }
        };
        Ok(Self {
            latitude: parse_number(field, lat)?,
            longitude: parse_number(field, lon)?,
        })
    }
}

impl FromStr for Location {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse("location", s)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Whitespace-tolerant float coercion. Non-finite values are refused since
/// they have no JSON representation.
pub fn parse_number(field: &'static str, raw: &str) -> Result<f64, ParamError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| ParamError::Number {
            field,
            value: raw.to_string(),
        })
}

/// Raw query string of `GET /predict_fare`; every field is optional.
#[derive(Debug, Clone, Default)]
pub struct RideQuery {
    pub pickup_location: Option<String>,
    pub dropoff_location: Option<String>,
    pub passenger_count: Option<String>,
}

impl RideQuery {
    /// First occurrence of each key wins; unknown keys are ignored.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut q = Self::default();
        for (k, v) in pairs {
            let slot = match k.as_str() {
                "pickup_location" => &mut q.pickup_location,
                "dropoff_location" => &mut q.dropoff_location,
                "passenger_count" => &mut q.passenger_count,
                _ => continue,
            };
            slot.get_or_insert(v);
        }
        q
    }
}

/// Substituted for omitted query fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RideDefaults {
    pub location: Location,
    pub passenger_count: f64,
}

impl Default for RideDefaults {
    fn default() -> Self {
        Self {
            location: DEFAULT_LOCATION,
            passenger_count: DEFAULT_PASSENGER_COUNT,
        }
    }
}

/// The instance sent to the model. Field order is part of the response shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideParams {
    pub pickup_latitude: f64,
    pub pickup_longitude: f64,
    pub dropoff_latitude: f64,
    pub dropoff_longitude: f64,
    pub passenger_count: f64,
    pub pickup_datetime: String,
}

impl RideParams {
    pub fn from_query(
        query: &RideQuery,
        defaults: &RideDefaults,
        pickup_datetime: String,
    ) -> Result<Self, ParamError> {
        let pickup = match query.pickup_location.as_deref() {
            Some(raw) => Location::parse("pickup_location", raw)?,
            None => defaults.location,
        };
        let dropoff = match query.dropoff_location.as_deref() {
            Some(raw) => Location::parse("dropoff_location", raw)?,
            None => defaults.location,
        };
        let passenger_count = match query.passenger_count.as_deref() {
            Some(raw) => parse_number("passenger_count", raw)?,
            None => defaults.passenger_count,
        };
        Ok(Self {
            pickup_latitude: pickup.latitude,
            pickup_longitude: pickup.longitude,
            dropoff_latitude: dropoff.latitude,
            dropoff_longitude: dropoff.longitude,
            passenger_count,
            pickup_datetime,
        })
    }
}
