use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Market data unavailable: {0}")]
    DataUnavailable(String),
    #[error("No historical price data was returned")]
    EmptySeries,
    #[error("No prediction data available")]
    EmptyForecast,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Cannot size a purchase at price {0}")]
    InvalidPrice(f64),
}
