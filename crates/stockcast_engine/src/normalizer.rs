use crate::data_point::{Ohlc, PricePoint, Quote};
use crate::error::PipelineError;
use stockcast_shared_models::{BarPayload, QuotePayload, SeriesPayload};
use tracing::debug;

pub fn normalize_quote<Q: QuotePayload>(payload: &Q) -> Result<Quote, PipelineError> {
    let current_price = payload.current_price().ok_or_else(|| {
        PipelineError::DataUnavailable("quote has no current price".to_string())
    })?;

    Ok(Quote {
        current_price,
        open: payload.open(),
        high: payload.high(),
        low: payload.low(),
        previous_close: payload.previous_close(),
    })
}

fn ohlc<B: BarPayload>(bar: &B, close: f64) -> Option<Ohlc> {
    Some(Ohlc {
        open: bar.open()?,
        high: bar.high()?,
        low: bar.low()?,
        close,
    })
}

/// Converts vendor bars into an ascending, duplicate-free close series.
///
/// Vendors usually send newest-first; order is not trusted, the points are
/// sorted. When two bars share a timestamp the first one in ascending
/// order is kept.
pub fn normalize_series<S: SeriesPayload>(payload: &S) -> Result<Vec<PricePoint>, PipelineError> {
    if let Some(message) = payload.error_message() {
        return Err(PipelineError::DataUnavailable(message));
    }

    let bars = payload.bars().ok_or_else(|| {
        PipelineError::DataUnavailable("series has no values".to_string())
    })?;

    if bars.is_empty() {
        return Err(PipelineError::EmptySeries);
    }

    let mut points = bars
        .iter()
        .enumerate()
        .map(|(idx, bar)| {
            let datetime = bar.datetime().ok_or_else(|| {
                PipelineError::DataUnavailable(format!("bar {idx} has no valid datetime"))
            })?;
            let close = bar.close().ok_or_else(|| {
                PipelineError::DataUnavailable(format!("bar {idx} has no valid close"))
            })?;

            Ok(PricePoint {
                datetime,
                close,
                ohlc: ohlc(bar, close),
            })
        })
        .collect::<Result<Vec<_>, PipelineError>>()?;

    points.sort_by_key(|p| p.datetime);

    let before = points.len();
    points.dedup_by_key(|p| p.datetime);
    if points.len() != before {
        debug!(dropped = before - points.len(), "dropped duplicate bars");
    }

    Ok(points)
}

pub fn normalize<Q: QuotePayload, S: SeriesPayload>(
    quote: &Q,
    series: &S,
) -> Result<(Quote, Vec<PricePoint>), PipelineError> {
    Ok((normalize_quote(quote)?, normalize_series(series)?))
}
