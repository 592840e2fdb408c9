use crate::method::Method;
use bon::Builder;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use stockcast_shared_models::{BarPayload, SeriesPayload};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    #[serde(rename = "1min")]
    OneMinute,
    #[serde(rename = "5min")]
    FiveMinutes,
    #[serde(rename = "15min")]
    FifteenMinutes,
    #[serde(rename = "30min")]
    ThirtyMinutes,
    #[serde(rename = "45min")]
    FortyFiveMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "2h")]
    TwoHours,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1day")]
    OneDay,
    #[serde(rename = "1week")]
    OneWeek,
    #[serde(rename = "1month")]
    OneMonth,
}

impl Interval {
    pub const ALL: [Interval; 11] = [
        Interval::OneMinute,
        Interval::FiveMinutes,
        Interval::FifteenMinutes,
        Interval::ThirtyMinutes,
        Interval::FortyFiveMinutes,
        Interval::OneHour,
        Interval::TwoHours,
        Interval::FourHours,
        Interval::OneDay,
        Interval::OneWeek,
        Interval::OneMonth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneMinute => "1min",
            Interval::FiveMinutes => "5min",
            Interval::FifteenMinutes => "15min",
            Interval::ThirtyMinutes => "30min",
            Interval::FortyFiveMinutes => "45min",
            Interval::OneHour => "1h",
            Interval::TwoHours => "2h",
            Interval::FourHours => "4h",
            Interval::OneDay => "1day",
            Interval::OneWeek => "1week",
            Interval::OneMonth => "1month",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Interval::ALL
            .into_iter()
            .find(|interval| interval.as_str() == wanted)
            .ok_or_else(|| format!("Unknown interval: '{s}'"))
    }
}

#[derive(Serialize, Deserialize, Debug, Builder)]
#[builder(on(String, into))]
pub struct TimeSeriesParams {
    pub symbol: String,
    pub interval: Interval,
    #[serde(rename = "outputsize", skip_serializing_if = "Option::is_none")]
    pub output_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Bars are requested in UTC so their datetimes can be read as instants.
    #[builder(default = String::from("UTC"))]
    pub timezone: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TimeSeriesResponse {
    pub status: String,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub meta: Option<Meta>,
    #[serde(default)]
    pub values: Option<Vec<TimeSeriesValue>>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Meta {
    pub symbol: String,
    pub interval: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub exchange_timezone: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default)]
    pub mic_code: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// One bar. Twelve Data sends every number as a decimal string.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct TimeSeriesValue {
    #[serde(default)]
    pub datetime: Option<String>,
    #[serde(default)]
    pub open: Option<String>,
    #[serde(default)]
    pub high: Option<String>,
    #[serde(default)]
    pub low: Option<String>,
    #[serde(default)]
    pub close: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
}

fn parse_number(raw: Option<&String>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Intraday bars carry a time of day, daily and wider bars only a date.
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    Some(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}

impl BarPayload for TimeSeriesValue {
    fn datetime(&self) -> Option<DateTime<Utc>> {
        self.datetime.as_deref().and_then(parse_datetime)
    }

    fn close(&self) -> Option<f64> {
        parse_number(self.close.as_ref())
    }

    fn open(&self) -> Option<f64> {
        parse_number(self.open.as_ref())
    }

    fn high(&self) -> Option<f64> {
        parse_number(self.high.as_ref())
    }

    fn low(&self) -> Option<f64> {
        parse_number(self.low.as_ref())
    }
}

impl SeriesPayload for TimeSeriesResponse {
    type Bar = TimeSeriesValue;

    fn error_message(&self) -> Option<String> {
        if self.status.eq_ignore_ascii_case("error") {
            let message = self.message.clone().unwrap_or_else(|| "unknown error".to_string());
            Some(match self.code {
                Some(code) => format!("{message} (code {code})"),
                None => message,
            })
        } else {
            None
        }
    }

    fn bars(&self) -> Option<&[TimeSeriesValue]> {
        self.values.as_deref()
    }
}

pub struct TimeSeries;

impl Method for TimeSeries {
    const PATH: &'static str = "/time_series";

    type Response = TimeSeriesResponse;
    type Params = TimeSeriesParams;
}
