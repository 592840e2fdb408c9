use chrono::{TimeZone, Utc};
use stockcast_shared_models::{BarPayload, SeriesPayload};
use stockcast_twelvedata::TwelveDataClient;
use stockcast_twelvedata::time_series::{
    Interval, TimeSeries, TimeSeriesParams, TimeSeriesResponse, parse_datetime,
};

const INTRADAY: &str = r#"{
    "meta": {
        "symbol": "AAPL",
        "interval": "30min",
        "currency": "USD",
        "exchange_timezone": "America/New_York",
        "exchange": "NASDAQ",
        "mic_code": "XNGS",
        "type": "Common Stock"
    },
    "values": [
        {"datetime": "2024-09-27 19:30:00", "open": "227.71001", "high": "228.03999", "low": "227.50999", "close": "227.78999", "volume": "2469130"},
        {"datetime": "2024-09-27 19:00:00", "open": "227.52000", "high": "227.85001", "low": "227.34000", "close": "227.71001", "volume": "1143200"}
    ],
    "status": "ok"
}"#;

#[test]
fn decodes_intraday_series() {
    let response: TimeSeriesResponse = serde_json::from_str(INTRADAY).expect("series should decode");

    assert_eq!(response.error_message(), None);
    let meta = response.meta.as_ref().expect("meta present");
    assert_eq!(meta.symbol, "AAPL");
    assert_eq!(meta.kind.as_deref(), Some("Common Stock"));

    let bars = response.bars().expect("values present");
    assert_eq!(bars.len(), 2);
    assert_eq!(
        bars[0].datetime(),
        Some(Utc.with_ymd_and_hms(2024, 9, 27, 19, 30, 0).unwrap())
    );
    assert_eq!(bars[0].close(), Some(227.78999));
    assert_eq!(bars[0].open(), Some(227.71001));
    assert_eq!(bars[0].high(), Some(228.03999));
    assert_eq!(bars[0].low(), Some(227.50999));
}

#[test]
fn error_payload_is_reported() {
    let body = r#"{"code":400,"message":"**symbol** not found: NOPE.","status":"error"}"#;

    let response: TimeSeriesResponse = serde_json::from_str(body).expect("error should decode");

    assert!(response.bars().is_none());
    assert_eq!(
        response.error_message().as_deref(),
        Some("**symbol** not found: NOPE. (code 400)")
    );
}

#[test]
fn daily_datetimes_parse_at_midnight() {
    assert_eq!(
        parse_datetime("2024-09-27"),
        Some(Utc.with_ymd_and_hms(2024, 9, 27, 0, 0, 0).unwrap())
    );
    assert_eq!(parse_datetime("27/09/2024"), None);
}

#[test]
fn unparseable_close_is_none() {
    let bar: stockcast_twelvedata::time_series::TimeSeriesValue =
        serde_json::from_str(r#"{"datetime": "2024-09-27", "close": "n/a"}"#).expect("bar should decode");

    assert_eq!(bar.close(), None);
    assert!(bar.datetime().is_some());
}

#[test]
fn interval_round_trips_through_strings() {
    assert_eq!("30min".parse::<Interval>(), Ok(Interval::ThirtyMinutes));
    assert_eq!("1DAY".parse::<Interval>(), Ok(Interval::OneDay));
    assert!("3h".parse::<Interval>().is_err());
    assert_eq!(Interval::OneHour.to_string(), "1h");
}

#[test]
fn params_serialize_with_vendor_names() {
    let params = TimeSeriesParams::builder()
        .symbol("AAPL")
        .interval(Interval::OneDay)
        .output_size(30)
        .build();

    let json = serde_json::to_value(&params).expect("params should serialize");

    assert_eq!(
        json,
        serde_json::json!({
            "symbol": "AAPL",
            "interval": "1day",
            "outputsize": 30,
            "timezone": "UTC"
        })
    );
}

#[tokio::test]
#[ignore = "hits the live Twelve Data API; needs $TWELVE_DATA_API_KEY"]
pub async fn fetch_time_series() {
    let client = TwelveDataClient::new(
        std::env::var("TWELVE_DATA_API_KEY")
            .expect("Fill $TWELVE_DATA_API_KEY")
            .as_str(),
    )
    .expect("Failed to build client");

    let response = client
        .call::<TimeSeries>(
            TimeSeriesParams::builder()
                .symbol("AAPL")
                .interval(Interval::OneDay)
                .output_size(10)
                .build(),
        )
        .await
        .expect("Failed to fetch time series");

    assert_eq!(response.error_message(), None);
    assert!(!response.bars().unwrap_or_default().is_empty());
}
