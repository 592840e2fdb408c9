use crate::config::Config;
use chrono::NaiveDate;
use stockcast_engine::forecast::Stride;
use stockcast_engine::Symbol;
use stockcast_finnhub::quote::{Quote, QuoteParams, QuoteResponse};
use stockcast_finnhub::FinnhubClient;
use stockcast_twelvedata::time_series::{Interval, TimeSeries, TimeSeriesParams, TimeSeriesResponse};
use stockcast_twelvedata::TwelveDataClient;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Quote request for {symbol} failed: {source}")]
    Quote {
        symbol: String,
        source: reqwest::Error,
    },
    #[error("Time series request for {symbol} failed: {source}")]
    Series {
        symbol: String,
        source: reqwest::Error,
    },
    #[error("Finnhub client: {0}")]
    FinnhubClient(#[from] stockcast_finnhub::ClientError),
    #[error("Twelve Data client: {0}")]
    TwelveDataClient(#[from] stockcast_twelvedata::ClientError),
}

#[derive(Debug)]
pub struct FetchedData {
    pub quote: QuoteResponse,
    pub series: TimeSeriesResponse,
}

/// Which bars to request from the series vendor.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesWindow {
    pub interval: Interval,
    pub output_size: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl SeriesWindow {
    pub fn new(interval: Interval) -> Self {
        Self {
            interval,
            output_size: None,
            start_date: None,
            end_date: None,
        }
    }

    fn params(&self, symbol: &Symbol) -> TimeSeriesParams {
        let date = |d: NaiveDate| d.format("%Y-%m-%d").to_string();

        TimeSeriesParams::builder()
            .symbol(symbol.as_str())
            .interval(self.interval)
            .maybe_output_size(self.output_size)
            .maybe_start_date(self.start_date.map(date))
            .maybe_end_date(self.end_date.map(date))
            .build()
    }
}

/// Series interval that matches a forecast stride.
pub fn interval_for(stride: Stride) -> Interval {
    match stride {
        Stride::ThirtyMinutes => Interval::ThirtyMinutes,
        Stride::OneHour => Interval::OneHour,
        Stride::OneDay => Interval::OneDay,
    }
}

pub struct MarketDataFetcher {
    finnhub: FinnhubClient,
    twelve_data: TwelveDataClient,
}

impl MarketDataFetcher {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        Ok(Self {
            finnhub: FinnhubClient::with_options(
                &config.finnhub_api_key,
                &config.finnhub_url,
                config.timeout,
            )?,
            twelve_data: TwelveDataClient::with_options(
                &config.twelve_data_api_key,
                &config.twelve_data_url,
                config.timeout,
            )?,
        })
    }

    /// Quote first, then series. Either failure fails the whole fetch and
    /// nothing is retried.
    pub async fn fetch(
        &self,
        symbol: &Symbol,
        window: &SeriesWindow,
    ) -> Result<FetchedData, FetchError> {
        info!(%symbol, interval = %window.interval, "fetching quote and series");

        let quote = self
            .finnhub
            .call::<Quote>(QuoteParams::builder().symbol(symbol.as_str()).build())
            .await
            .map_err(|source| FetchError::Quote {
                symbol: symbol.to_string(),
                source,
            })?;
        debug!(?quote, "quote received");

        let series = self
            .twelve_data
            .call::<TimeSeries>(window.params(symbol))
            .await
            .map_err(|source| FetchError::Series {
                symbol: symbol.to_string(),
                source,
            })?;
        debug!(
            status = %series.status,
            bars = series.values.as_ref().map_or(0, Vec::len),
            "series received"
        );

        Ok(FetchedData { quote, series })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides_map_to_matching_intervals() {
        assert_eq!(interval_for(Stride::ThirtyMinutes), Interval::ThirtyMinutes);
        assert_eq!(interval_for(Stride::OneHour), Interval::OneHour);
        assert_eq!(interval_for(Stride::OneDay), Interval::OneDay);
    }

    #[test]
    fn window_carries_the_date_range() {
        let window = SeriesWindow {
            interval: Interval::OneHour,
            output_size: Some(50),
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 8),
        };

        let params = window.params(&Symbol::parse("msft").unwrap());

        assert_eq!(params.symbol, "MSFT");
        assert_eq!(params.output_size, Some(50));
        assert_eq!(params.start_date.as_deref(), Some("2024-03-01"));
        assert_eq!(params.end_date.as_deref(), Some("2024-03-08"));

        let open = SeriesWindow::new(Interval::OneDay).params(&Symbol::parse("AAPL").unwrap());
        assert!(open.start_date.is_none() && open.end_date.is_none());
    }

    #[tokio::test]
    async fn unreachable_quote_vendor_fails_the_fetch() {
        let config = Config {
            finnhub_api_key: "key".to_string(),
            twelve_data_api_key: "key".to_string(),
            finnhub_url: "http://127.0.0.1:9".to_string(),
            twelve_data_url: "http://127.0.0.1:9".to_string(),
            timeout: Some(std::time::Duration::from_secs(2)),
        };
        let fetcher = MarketDataFetcher::new(&config).unwrap();

        let result = fetcher
            .fetch(&Symbol::parse("AAPL").unwrap(), &SeriesWindow::new(Interval::OneDay))
            .await;

        assert!(matches!(result, Err(FetchError::Quote { .. })));
    }
}
