use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Buy => write!(f, "BUY"),
            Recommendation::Sell => write!(f, "SELL"),
            Recommendation::Hold => write!(f, "HOLD"),
        }
    }
}

/// A vendor quote response that can yield a current price.
pub trait QuotePayload {
    /// `None` when the vendor did not report a usable price.
    fn current_price(&self) -> Option<f64>;

    fn open(&self) -> Option<f64> {
        None
    }

    fn high(&self) -> Option<f64> {
        None
    }

    fn low(&self) -> Option<f64> {
        None
    }

    fn previous_close(&self) -> Option<f64> {
        None
    }
}

/// A vendor time-series response. Bars may come in any order.
pub trait SeriesPayload {
    type Bar: BarPayload;

    /// Failure reported inside an otherwise successful HTTP response.
    fn error_message(&self) -> Option<String> {
        None
    }

    /// `None` when the payload has no bar collection at all.
    fn bars(&self) -> Option<&[Self::Bar]>;
}

pub trait BarPayload {
    fn datetime(&self) -> Option<DateTime<Utc>>;
    fn close(&self) -> Option<f64>;

    fn open(&self) -> Option<f64> {
        None
    }

    fn high(&self) -> Option<f64> {
        None
    }

    fn low(&self) -> Option<f64> {
        None
    }
}
