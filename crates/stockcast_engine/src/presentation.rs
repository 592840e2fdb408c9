use crate::data_point::{ForecastPoint, Ohlc, PricePoint};
use crate::error::PipelineError;
use prettytable::{row, Table};
use serde::Serialize;
use std::fmt;
use std::iter;
use stockcast_shared_models::Recommendation;

pub const ACTUAL_SERIES: &str = "Actual Price";
pub const PREDICTED_SERIES: &str = "Predicted Price";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// What the chart renderer consumes: one label axis shared by every series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataset {
    pub title: String,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    /// Aligned with `labels`; empty when the history had no OHLC bars.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub candles: Vec<Option<Ohlc>>,
}

impl ChartDataset {
    /// Actual values are padded with `None` over the forecast region and
    /// predicted values with `None` over the history region.
    pub fn build(
        title: impl Into<String>,
        history: &[PricePoint],
        forecast: &[ForecastPoint],
        label_format: &str,
    ) -> Self {
        let labels = history
            .iter()
            .map(|p| p.datetime)
            .chain(forecast.iter().map(|f| f.datetime))
            .map(|dt| dt.format(label_format).to_string())
            .collect();

        let actual = history
            .iter()
            .map(|p| Some(p.close))
            .chain(iter::repeat(None).take(forecast.len()))
            .collect();

        let predicted = iter::repeat(None)
            .take(history.len())
            .chain(forecast.iter().map(|f| Some(f.predicted_price)))
            .collect();

        let candles = if history.iter().any(|p| p.ohlc.is_some()) {
            history
                .iter()
                .map(|p| p.ohlc)
                .chain(iter::repeat(None).take(forecast.len()))
                .collect()
        } else {
            Vec::new()
        };

        Self {
            title: title.into(),
            labels,
            series: vec![
                Series {
                    name: ACTUAL_SERIES.to_string(),
                    values: actual,
                },
                Series {
                    name: PREDICTED_SERIES.to_string(),
                    values: predicted,
                },
            ],
            candles,
        }
    }

    pub fn series(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }

    /// True when every actual value has a candle to draw.
    pub fn has_candles(&self) -> bool {
        let Some(actual) = self.series(ACTUAL_SERIES) else {
            return false;
        };

        self.candles.len() == self.labels.len()
            && actual
                .values
                .iter()
                .zip(&self.candles)
                .all(|(value, candle)| value.is_none() || candle.is_some())
    }

    /// Min and max over every non-null value of every series.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let candle_values = self
            .candles
            .iter()
            .flatten()
            .flat_map(|c| [c.low, c.high]);

        self.series
            .iter()
            .flat_map(|s| s.values.iter().flatten().copied())
            .chain(candle_values)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// The recommendation block printed after a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub symbol: String,
    pub recommendation: Result<Recommendation, PipelineError>,
    pub current_price: f64,
    pub next_prediction: Option<f64>,
    pub best_time_to_buy: String,
    pub buy_amount: Result<u64, PipelineError>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Symbol: {}", self.symbol)?;
        match &self.recommendation {
            Ok(recommendation) => writeln!(f, "Recommendation: {recommendation}")?,
            Err(e) => writeln!(f, "Recommendation: unavailable ({e})")?,
        }
        writeln!(f, "Current Price: ${:.2}", self.current_price)?;
        match self.next_prediction {
            Some(price) => writeln!(f, "Predicted Price (next): ${price:.2}")?,
            None => writeln!(f, "Predicted Price (next): N/A")?,
        }
        writeln!(f, "Best Time to Buy: {}", self.best_time_to_buy)?;
        match &self.buy_amount {
            Ok(shares) => write!(
                f,
                "Amount to Buy: {shares} shares at ${:.2}",
                self.current_price
            ),
            Err(e) => write!(f, "Amount to Buy: unavailable ({e})"),
        }
    }
}

pub fn forecast_table(forecast: &[ForecastPoint], label_format: &str) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["Time", "Predicted Price"]);

    for point in forecast {
        table.add_row(row![
            point.datetime.format(label_format).to_string(),
            format!("${:.2}", point.predicted_price)
        ]);
    }

    table
}
