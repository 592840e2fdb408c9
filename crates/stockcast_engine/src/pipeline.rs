use crate::data_point::{ForecastPoint, PricePoint, Quote};
use crate::error::PipelineError;
use crate::forecast::{self, PriceStrategy, Stride};
use crate::normalizer;
use crate::presentation::{ChartDataset, Report};
use crate::signal::{self, BestTimeToBuy};
use crate::symbol::Symbol;
use stockcast_shared_models::{QuotePayload, Recommendation, SeriesPayload};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct Params {
    pub steps: usize,
    pub stride: Stride,
    pub balance: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            steps: 5,
            stride: Stride::OneDay,
            balance: 10_000.0,
        }
    }
}

/// Everything derived from one quote and one series for a symbol.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub symbol: Symbol,
    pub quote: Quote,
    pub history: Vec<PricePoint>,
    pub forecast: Vec<ForecastPoint>,
    pub params: Params,
}

impl Analysis {
    /// Normalizes both payloads and derives the forecast. Fails as a whole
    /// if either payload is unusable.
    pub fn run<Q, S, P>(
        symbol: Symbol,
        quote: &Q,
        series: &S,
        strategy: &P,
        params: Params,
    ) -> Result<Self, PipelineError>
    where
        Q: QuotePayload,
        S: SeriesPayload,
        P: PriceStrategy + ?Sized,
    {
        let (quote, history) = normalizer::normalize(quote, series)?;
        let last = history.last().ok_or(PipelineError::EmptySeries)?;

        let forecast = forecast::forecast(&symbol, last, strategy, params.stride, params.steps);
        if forecast.len() < params.steps {
            debug!(
                requested = params.steps,
                produced = forecast.len(),
                strategy = strategy.name(),
                "forecast shorter than requested"
            );
        }

        info!(
            symbol = %symbol,
            bars = history.len(),
            forecast = forecast.len(),
            current_price = quote.current_price,
            "analysis complete"
        );

        Ok(Self {
            symbol,
            quote,
            history,
            forecast,
            params,
        })
    }

    pub fn label_format(&self) -> &'static str {
        self.params.stride.label_format()
    }

    pub fn next_prediction(&self) -> Option<f64> {
        self.forecast.first().map(|p| p.predicted_price)
    }

    pub fn recommendation(&self) -> Result<Recommendation, PipelineError> {
        self.next_prediction()
            .map(|predicted| signal::signal(predicted, self.quote.current_price))
            .ok_or(PipelineError::EmptyForecast)
    }

    pub fn best_time_to_buy(&self) -> BestTimeToBuy {
        signal::best_time_to_buy(&self.forecast)
    }

    pub fn buy_amount(&self) -> Result<u64, PipelineError> {
        signal::buy_amount(self.params.balance, self.quote.current_price)
    }

    pub fn chart_dataset(&self) -> ChartDataset {
        ChartDataset::build(
            format!("{} Price ({})", self.symbol, self.params.stride),
            &self.history,
            &self.forecast,
            self.label_format(),
        )
    }

    pub fn report(&self) -> Report {
        Report {
            symbol: self.symbol.to_string(),
            recommendation: self.recommendation(),
            current_price: self.quote.current_price,
            next_prediction: self.next_prediction(),
            best_time_to_buy: self.best_time_to_buy().describe(self.label_format()),
            buy_amount: self.buy_amount(),
        }
    }
}
