//! Live chart of the rolling buffers
//!
//! Acquisition hands a `ChartFrame` to a `Presenter` after every accepted
//! line. The terminal chart is one presenter; `NullPresenter` is used when
//! drawing is off.

pub mod terminal;

pub use terminal::{restore_terminal, TerminalChart};

use anyhow::Result;
use std::time::Duration;

use crate::sensors::{Quantity, QuantityKind, SensorLayout};
use crate::telemetry::History;

/// Pause after each redraw when nothing else is configured
pub const DEFAULT_PAUSE: Duration = Duration::from_millis(100);

/// Drawing options of the `measure` and `quantities` commands
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    /// Plot log10 of the samples
    pub log_y: bool,
    /// Leave pressure out of the chart
    pub hide_pressure: bool,
    /// Pause after each redraw
    pub pause: Duration,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            log_y: false,
            hide_pressure: false,
            pause: DEFAULT_PAUSE,
        }
    }
}

/// Everything a presenter needs to draw one frame
pub struct ChartFrame<'a> {
    pub layout: &'a SensorLayout,
    pub history: &'a History,
    pub options: &'a ChartOptions,
    /// Last raw line or warning, shown under the chart
    pub status: Option<&'a str>,
}

/// One plotted quantity
#[derive(Debug, Clone, PartialEq)]
pub struct Series<'a> {
    pub quantity: &'a Quantity,
    /// (elapsed seconds, value) pairs, log10-scaled when requested
    pub points: Vec<(f64, f64)>,
}

impl<'a> ChartFrame<'a> {
    /// Visible quantities paired with the elapsed-time series
    pub fn series(&self) -> Vec<Series<'a>> {
        let layout = self.layout;
        let history = self.history;
        let options = self.options;

        layout
            .quantities()
            .enumerate()
            .filter(|(_, q)| !(options.hide_pressure && q.kind == QuantityKind::Pressure))
            .filter_map(|(index, quantity)| {
                let buffer = history.series(index)?;
                let points = history
                    .times()
                    .iter()
                    .zip(buffer.iter())
                    .filter_map(|(t, v)| scale(v, options.log_y).map(|v| (t, v)))
                    .collect();
                Some(Series { quantity, points })
            })
            .collect()
    }
}

/// Value as plotted; non-positive samples have no log
fn scale(value: f64, log_y: bool) -> Option<f64> {
    if !log_y {
        return Some(value);
    }
    (value > 0.0).then(|| value.log10())
}

/// Axis bounds `([x_min, x_max], [y_min, y_max])` covering every point
pub fn bounds(series: &[Series<'_>]) -> ([f64; 2], [f64; 2]) {
    let mut x = [f64::MAX, f64::MIN];
    let mut y = [f64::MAX, f64::MIN];

    for (t, v) in series.iter().flat_map(|s| s.points.iter()) {
        x = [x[0].min(*t), x[1].max(*t)];
        y = [y[0].min(*v), y[1].max(*v)];
    }

    if x[0] > x[1] {
        return ([0.0, 1.0], [0.0, 1.0]);
    }
    if x[1] - x[0] < f64::EPSILON {
        x[1] = x[0] + 1.0;
    }
    if y[1] - y[0] < f64::EPSILON {
        y = [y[0] - 0.5, y[1] + 0.5];
    }
    (x, y)
}

/// Presentation stage fed after every accepted line
pub trait Presenter {
    fn present(&mut self, frame: &ChartFrame<'_>) -> Result<()>;

    /// Whether the presenter owns the terminal (stdout must stay quiet)
    fn is_interactive(&self) -> bool {
        false
    }

    /// Release the display at the end of the session
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Headless presenter
#[derive(Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn present(&mut self, _frame: &ChartFrame<'_>) -> Result<()> {
        Ok(())
    }
}
