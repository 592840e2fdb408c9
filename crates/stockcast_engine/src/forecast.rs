use crate::data_point::{ForecastPoint, PricePoint};
use crate::symbol::Symbol;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::iter;
use std::str::FromStr;
use tracing::warn;

/// Distance between two generated forecast labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stride {
    ThirtyMinutes,
    OneHour,
    OneDay,
}

impl Stride {
    pub fn duration(&self) -> Duration {
        match self {
            Stride::ThirtyMinutes => Duration::minutes(30),
            Stride::OneHour => Duration::hours(1),
            Stride::OneDay => Duration::days(1),
        }
    }

    /// `chrono` format string for axis labels at this granularity.
    pub fn label_format(&self) -> &'static str {
        match self {
            Stride::OneDay => "%Y-%m-%d",
            Stride::ThirtyMinutes | Stride::OneHour => "%Y-%m-%d %H:%M",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stride::ThirtyMinutes => "30min",
            Stride::OneHour => "1h",
            Stride::OneDay => "1day",
        }
    }
}

impl fmt::Display for Stride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stride {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "30min" | "30m" => Ok(Stride::ThirtyMinutes),
            "1h" | "60min" => Ok(Stride::OneHour),
            "1day" | "1d" => Ok(Stride::OneDay),
            _ => Err(format!("Unknown stride: '{s}'. Supported: 30min, 1h, 1day")),
        }
    }
}

/// Produces predicted prices for the steps after the last observation.
pub trait PriceStrategy {
    fn predict(&self, symbol: &Symbol, last_price: f64, steps: usize) -> Vec<f64>;

    fn name(&self) -> &str;
}

/// Fixed per-step growth: step `i` is `last_price * growth^(i+1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extrapolation {
    pub growth: f64,
}

impl Extrapolation {
    pub fn new(growth: f64) -> Self {
        Self { growth }
    }
}

impl Default for Extrapolation {
    fn default() -> Self {
        Self { growth: 1.02 }
    }
}

impl PriceStrategy for Extrapolation {
    fn predict(&self, _symbol: &Symbol, last_price: f64, steps: usize) -> Vec<f64> {
        iter::successors(Some(last_price * self.growth), |price| Some(price * self.growth))
            .take(steps)
            .collect()
    }

    fn name(&self) -> &str {
        "extrapolation"
    }
}

/// Static per-symbol predictions. Unknown symbols predict nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLookup {
    table: HashMap<String, Vec<f64>>,
}

impl TableLookup {
    pub fn new(table: HashMap<String, Vec<f64>>) -> Self {
        Self {
            table: table
                .into_iter()
                .map(|(symbol, prices)| (symbol.to_uppercase(), prices))
                .collect(),
        }
    }

    pub fn get(&self, symbol: &Symbol) -> &[f64] {
        self.table
            .get(symbol.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl Default for TableLookup {
    fn default() -> Self {
        Self::new(HashMap::from([
            (
                "AAPL".to_string(),
                vec![150.23, 151.56, 152.78, 153.12, 154.23],
            ),
            (
                "GOOG".to_string(),
                vec![2800.25, 2805.15, 2810.33, 2815.22, 2820.30],
            ),
        ]))
    }
}

impl PriceStrategy for TableLookup {
    fn predict(&self, symbol: &Symbol, _last_price: f64, _steps: usize) -> Vec<f64> {
        self.get(symbol).to_vec()
    }

    fn name(&self) -> &str {
        "table"
    }
}

/// Exactly `steps` labels, independent of how many prices exist. Labels
/// stop early only where the timestamp would leave chrono's range.
pub fn generate_labels(last: DateTime<Utc>, stride: Stride, steps: usize) -> Vec<DateTime<Utc>> {
    let step = stride.duration();
    let labels: Vec<_> = iter::successors(last.checked_add_signed(step), |at| {
        at.checked_add_signed(step)
    })
    .take(steps)
    .collect();

    if labels.len() < steps {
        warn!(requested = steps, produced = labels.len(), "forecast labels overflow the calendar");
    }
    labels
}

/// Pairs generated labels with strategy prices. The result has
/// `min(labels, prices)` points and ends before the first price that is
/// not finite.
pub fn forecast<P: PriceStrategy + ?Sized>(
    symbol: &Symbol,
    last: &PricePoint,
    strategy: &P,
    stride: Stride,
    steps: usize,
) -> Vec<ForecastPoint> {
    let labels = generate_labels(last.datetime, stride, steps);
    let prices = strategy.predict(symbol, last.close, steps);
    let expected = labels.len().min(prices.len());

    let points: Vec<_> = labels
        .into_iter()
        .zip(prices)
        .take_while(|(_, price)| price.is_finite())
        .map(|(datetime, predicted_price)| ForecastPoint {
            datetime,
            predicted_price,
        })
        .collect();

    if points.len() < expected {
        warn!(strategy = strategy.name(), kept = points.len(), "dropped non-finite predictions");
    }
    points
}
