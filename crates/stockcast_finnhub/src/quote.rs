use crate::method::Method;
use bon::Builder;
use serde::{Deserialize, Serialize};
use stockcast_shared_models::QuotePayload;

#[derive(Serialize, Deserialize, Debug, Builder)]
#[builder(on(String, into))]
pub struct QuoteParams {
    pub symbol: String,
}

/// Finnhub answers unknown symbols with HTTP 200 and an all-zero quote,
/// so every field is optional and zero prices count as missing.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct QuoteResponse {
    #[serde(rename = "c")]
    pub current: Option<f64>,
    #[serde(rename = "d")]
    pub change: Option<f64>,
    #[serde(rename = "dp")]
    pub percent_change: Option<f64>,
    #[serde(rename = "h")]
    pub high: Option<f64>,
    #[serde(rename = "l")]
    pub low: Option<f64>,
    #[serde(rename = "o")]
    pub open: Option<f64>,
    #[serde(rename = "pc")]
    pub previous_close: Option<f64>,
    #[serde(rename = "t")]
    pub timestamp: Option<i64>,
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

impl QuotePayload for QuoteResponse {
    fn current_price(&self) -> Option<f64> {
        positive(self.current)
    }

    fn open(&self) -> Option<f64> {
        positive(self.open)
    }

    fn high(&self) -> Option<f64> {
        positive(self.high)
    }

    fn low(&self) -> Option<f64> {
        positive(self.low)
    }

    fn previous_close(&self) -> Option<f64> {
        positive(self.previous_close)
    }
}

pub struct Quote;

impl Method for Quote {
    const PATH: &'static str = "/quote";

    type Response = QuoteResponse;
    type Params = QuoteParams;
}
