use crate::data_point::ForecastPoint;
use crate::error::PipelineError;
use itertools::Itertools;
use stockcast_shared_models::Recommendation;

pub const BUY_THRESHOLD: f64 = 1.02;
pub const SELL_THRESHOLD: f64 = 0.98;

/// BUY above +2% of `current`, SELL below -2%, HOLD otherwise. Both
/// comparisons are strict.
pub fn signal(predicted: f64, current: f64) -> Recommendation {
    if predicted > current * BUY_THRESHOLD {
        Recommendation::Buy
    } else if predicted < current * SELL_THRESHOLD {
        Recommendation::Sell
    } else {
        Recommendation::Hold
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BestTimeToBuy {
    At(ForecastPoint),
    NotDetermined,
}

impl BestTimeToBuy {
    pub fn describe(&self, label_format: &str) -> String {
        match self {
            BestTimeToBuy::At(point) => format!(
                "{} (Predicted price: ${:.2})",
                point.datetime.format(label_format),
                point.predicted_price
            ),
            BestTimeToBuy::NotDetermined => "Not enough prediction data available.".to_string(),
        }
    }
}

/// Cheapest forecast point; the earliest one wins a tie.
pub fn best_time_to_buy(forecast: &[ForecastPoint]) -> BestTimeToBuy {
    forecast
        .iter()
        .position_min_by(|a, b| a.predicted_price.total_cmp(&b.predicted_price))
        .map(|idx| BestTimeToBuy::At(forecast[idx].clone()))
        .unwrap_or(BestTimeToBuy::NotDetermined)
}

/// Whole shares `balance` buys at `price`.
pub fn buy_amount(balance: f64, price: f64) -> Result<u64, PipelineError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(PipelineError::InvalidPrice(price));
    }

    if !balance.is_finite() || balance <= 0.0 {
        return Ok(0);
    }

    Ok((balance / price).floor() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn point(t: i64, price: f64) -> ForecastPoint {
        ForecastPoint {
            datetime: DateTime::<Utc>::from_timestamp(t, 0).unwrap(),
            predicted_price: price,
        }
    }

    #[test]
    fn signal_thresholds() {
        assert_eq!(signal(110.0, 100.0), Recommendation::Buy);
        assert_eq!(signal(90.0, 100.0), Recommendation::Sell);
        assert_eq!(signal(101.0, 100.0), Recommendation::Hold);
        assert_eq!(signal(99.0, 100.0), Recommendation::Hold);
    }

    #[test]
    fn signal_boundaries_hold() {
        for current in [1.0, 100.0, 150.0, 2817.5] {
            assert_eq!(signal(current * BUY_THRESHOLD, current), Recommendation::Hold);
            assert_eq!(signal(current * SELL_THRESHOLD, current), Recommendation::Hold);
        }
    }

    #[test]
    fn signal_with_zero_current() {
        assert_eq!(signal(1.0, 0.0), Recommendation::Buy);
        assert_eq!(signal(-1.0, 0.0), Recommendation::Sell);
        assert_eq!(signal(0.0, 0.0), Recommendation::Hold);
    }

    #[test]
    fn best_time_picks_minimum() {
        let forecast = vec![point(1, 152.0), point(2, 149.5), point(3, 151.0)];

        assert_eq!(best_time_to_buy(&forecast), BestTimeToBuy::At(point(2, 149.5)));
    }

    #[test]
    fn best_time_prefers_earliest_tie() {
        let forecast = vec![point(1, 150.0), point(2, 149.0), point(3, 149.0)];

        assert_eq!(best_time_to_buy(&forecast), BestTimeToBuy::At(point(2, 149.0)));
    }

    #[test]
    fn best_time_on_empty_forecast() {
        let best = best_time_to_buy(&[]);

        assert_eq!(best, BestTimeToBuy::NotDetermined);
        assert_eq!(best.describe("%Y-%m-%d"), "Not enough prediction data available.");
    }

    #[test]
    fn best_time_description() {
        let best = BestTimeToBuy::At(point(86_400, 149.456));

        assert_eq!(best.describe("%Y-%m-%d"), "1970-01-02 (Predicted price: $149.46)");
    }

    #[test]
    fn buy_amount_floors() {
        assert_eq!(buy_amount(10_000.0, 100.0), Ok(100));
        assert_eq!(buy_amount(10_000.0, 150.0), Ok(66));
        assert_eq!(buy_amount(50.0, 100.0), Ok(0));
    }

    #[test]
    fn buy_amount_rejects_bad_prices() {
        assert_eq!(buy_amount(10_000.0, 0.0), Err(PipelineError::InvalidPrice(0.0)));
        assert_eq!(buy_amount(10_000.0, -5.0), Err(PipelineError::InvalidPrice(-5.0)));
        assert!(buy_amount(10_000.0, f64::NAN).is_err());
        assert!(buy_amount(10_000.0, f64::INFINITY).is_err());
    }

    #[test]
    fn buy_amount_with_negative_balance_is_zero() {
        assert_eq!(buy_amount(-10.0, 100.0), Ok(0));
    }
}
