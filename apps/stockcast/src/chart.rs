use clap::ValueEnum;
use plotters::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use stockcast_engine::presentation::{ChartDataset, ACTUAL_SERIES, PREDICTED_SERIES};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartKind {
    Line,
    Candlestick,
}

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Nothing to draw: the dataset has no values")]
    Empty,
    #[error("Failed to draw chart: {0}")]
    Draw(String),
    #[error("Chart file error: {0}")]
    Io(#[from] io::Error),
}

fn draw_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Draw(e.to_string())
}

/// Price axis bounds with 10% headroom, clamped at zero.
pub fn y_bounds(min: f64, max: f64) -> (f64, f64) {
    let range = (max - min).max(1e-8);
    let padding = range * 0.1;
    ((min - padding).max(0.0), max + padding)
}

fn points(values: &[Option<f64>]) -> Vec<(usize, f64)> {
    values
        .iter()
        .enumerate()
        .filter_map(|(idx, value)| value.map(|v| (idx, v)))
        .collect()
}

/// Whether the history is drawn as candles. Candlestick mode falls back to a
/// line when no bar carries OHLC data.
fn draws_candles(kind: ChartKind, dataset: &ChartDataset) -> bool {
    match kind {
        ChartKind::Candlestick if dataset.has_candles() => true,
        ChartKind::Candlestick => {
            warn!("history has no OHLC bars, drawing a line chart instead");
            false
        }
        ChartKind::Line => false,
    }
}

/// A rendered chart image. The owner updates it in place and removes it
/// with [`ChartHandle::destroy`].
#[derive(Debug)]
pub struct ChartHandle {
    path: PathBuf,
    size: (u32, u32),
    kind: ChartKind,
}

impl ChartHandle {
    pub fn render(
        path: impl Into<PathBuf>,
        size: (u32, u32),
        kind: ChartKind,
        dataset: &ChartDataset,
    ) -> Result<Self, ChartError> {
        let handle = Self {
            path: path.into(),
            size,
            kind,
        };
        handle.draw(dataset)?;

        Ok(handle)
    }

    pub fn update(&mut self, dataset: &ChartDataset) -> Result<(), ChartError> {
        self.draw(dataset)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn destroy(self) -> Result<(), ChartError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn draw(&self, dataset: &ChartDataset) -> Result<(), ChartError> {
        let (min, max) = dataset.value_range().ok_or(ChartError::Empty)?;
        let (y_min, y_max) = y_bounds(min, max);
        let x_max = dataset.labels.len().max(2);

        let candles = draws_candles(self.kind, dataset);

        let root = BitMapBackend::new(&self.path, self.size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&dataset.title, ("sans-serif", 32.0).into_font())
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(0..x_max, y_min..y_max)
            .map_err(draw_err)?;

        let label = |idx: &usize| dataset.labels.get(*idx).cloned().unwrap_or_default();
        let price = |value: &f64| format!("${value:.2}");

        chart
            .configure_mesh()
            .x_labels(8)
            .x_label_formatter(&label)
            .y_label_formatter(&price)
            .x_desc("Time")
            .y_desc("Price")
            .draw()
            .map_err(draw_err)?;

        if let Some(actual) = dataset.series(ACTUAL_SERIES) {
            if candles {
                let width = (self.size.0 / (x_max as u32 * 2)).clamp(1, 12);
                chart
                    .draw_series(dataset.candles.iter().enumerate().filter_map(|(idx, c)| {
                        c.map(|c| {
                            CandleStick::new(
                                idx,
                                c.open,
                                c.high,
                                c.low,
                                c.close,
                                GREEN.filled(),
                                RED.filled(),
                                width,
                            )
                        })
                    }))
                    .map_err(draw_err)?
                    .label(ACTUAL_SERIES)
                    .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], GREEN.filled()));
            } else {
                chart
                    .draw_series(LineSeries::new(points(&actual.values), &BLUE))
                    .map_err(draw_err)?
                    .label(ACTUAL_SERIES)
                    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));
            }
        }

        if let Some(predicted) = dataset.series(PREDICTED_SERIES) {
            let predicted = points(&predicted.values);
            chart
                .draw_series(LineSeries::new(predicted.iter().copied(), &MAGENTA))
                .map_err(draw_err)?
                .label(PREDICTED_SERIES)
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &MAGENTA));
            chart
                .draw_series(
                    predicted
                        .iter()
                        .map(|&(idx, value)| Circle::new((idx, value), 3, MAGENTA.filled())),
                )
                .map_err(draw_err)?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        debug!(path = %self.path.display(), "chart rendered");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use stockcast_engine::data_point::{ForecastPoint, Ohlc, PricePoint};

    fn dataset() -> ChartDataset {
        let at = |t: i64| DateTime::<Utc>::from_timestamp(t * 86_400, 0).unwrap();
        ChartDataset::build(
            "TEST Price (1day)",
            &[PricePoint::new(at(0), 10.0), PricePoint::new(at(1), 11.0)],
            &[ForecastPoint {
                datetime: at(2),
                predicted_price: 11.5,
            }],
            "%Y-%m-%d",
        )
    }

    #[test]
    fn y_bounds_pad_and_clamp() {
        let (lo, hi) = y_bounds(100.0, 200.0);
        assert!((lo - 90.0).abs() < 1e-9);
        assert!((hi - 210.0).abs() < 1e-9);

        let (lo, _) = y_bounds(1.0, 50.0);
        assert_eq!(lo, 0.0);

        let (lo, hi) = y_bounds(5.0, 5.0);
        assert!(lo < 5.0 && hi > 5.0);
    }

    #[test]
    fn points_skip_nulls() {
        assert_eq!(points(&[None, Some(1.0), None, Some(2.0)]), vec![(1, 1.0), (3, 2.0)]);
    }

    #[test]
    fn candlestick_needs_ohlc_bars() {
        let at = |t: i64| DateTime::<Utc>::from_timestamp(t * 86_400, 0).unwrap();
        let mut bar = PricePoint::new(at(0), 10.5);
        bar.ohlc = Some(Ohlc {
            open: 10.0,
            high: 11.0,
            low: 9.5,
            close: 10.5,
        });
        let with_bars = ChartDataset::build("OHLC", &[bar], &[], "%Y-%m-%d");

        assert!(draws_candles(ChartKind::Candlestick, &with_bars));
        assert!(!draws_candles(ChartKind::Line, &with_bars));
        assert!(!draws_candles(ChartKind::Candlestick, &dataset()));
    }

    #[test]
    fn empty_dataset_is_not_rendered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        let empty = ChartDataset::build("EMPTY", &[], &[], "%Y-%m-%d");

        let result = ChartHandle::render(&path, (320, 200), ChartKind::Line, &empty);

        assert!(matches!(result, Err(ChartError::Empty)));
        assert!(!path.exists());
    }

    #[test]
    #[ignore = "needs a system sans-serif font"]
    fn render_update_destroy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");

        let mut handle = ChartHandle::render(&path, (640, 400), ChartKind::Line, &dataset()).unwrap();
        assert!(handle.path().exists());

        handle.update(&dataset()).unwrap();
        assert!(path.exists());

        handle.destroy().unwrap();
        assert!(!path.exists());
    }
}
