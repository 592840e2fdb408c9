use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ohlc {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// One observed close. Sequences of these are kept in ascending time order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub datetime: DateTime<Utc>,
    pub close: f64,
    pub ohlc: Option<Ohlc>,
}

impl PricePoint {
    pub fn new(datetime: DateTime<Utc>, close: f64) -> Self {
        Self {
            datetime,
            close,
            ohlc: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub current_price: f64,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub previous_close: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub datetime: DateTime<Utc>,
    pub predicted_price: f64,
}
