//! Terminal chart of the rolling buffers
//!
//! ┌ bean-telemetry ─────────────────────────────┐
//! │ t BME [C]                                   │
//! │ RH BME [%]        ⡠⠤⠒⠉⠉⠒⠤⢄                  │
//! │        ⣀⠤⠔⠒⠊⠉⠁             ⠉⠒⠤⣀             │
//! │                       time [s]              │
//! └─────────────────────────────────────────────┘
//!  42 samples   21.5 45.2 10.1 1013.2 3.7
//!
//! Raw mode stays off so Ctrl+C still reaches the interrupt handler.

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, prelude::*, widgets::*};
use std::io::{self, Stdout};
use std::time::Duration;

use super::{bounds, ChartFrame, Presenter};
use crate::sensors::Rgb;

/// Chart drawn on a ratatui backend
pub struct TerminalChart<B: Backend> {
    terminal: Terminal<B>,
    pause: Duration,
    owns_screen: bool,
}

impl TerminalChart<CrosstermBackend<Stdout>> {
    /// Take over stdout with the alternate screen
    pub fn stdout(pause: Duration) -> Result<Self> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide).context("Failed to enter alternate screen")?;

        let terminal = Terminal::new(CrosstermBackend::new(stdout)).context("Failed to set up terminal")?;
        Ok(Self {
            terminal,
            pause,
            owns_screen: true,
        })
    }
}

#[cfg(test)]
impl<B: Backend> TerminalChart<B> {
    /// Draw on an arbitrary backend; the screen is left as is on exit
    pub fn with_backend(backend: B, pause: Duration) -> Result<Self> {
        let terminal = Terminal::new(backend).context("Failed to set up terminal")?;
        Ok(Self {
            terminal,
            pause,
            owns_screen: false,
        })
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }
}

impl<B: Backend> Presenter for TerminalChart<B> {
    fn present(&mut self, frame: &ChartFrame<'_>) -> Result<()> {
        self.terminal
            .draw(|f| draw(f, frame))
            .context("Failed to draw chart")?;

        if !self.pause.is_zero() {
            std::thread::sleep(self.pause);
        }
        Ok(())
    }

    fn is_interactive(&self) -> bool {
        self.owns_screen
    }

    fn finish(&mut self) -> Result<()> {
        if self.owns_screen {
            self.owns_screen = false;
            restore_terminal().context("Failed to restore terminal")?;
        }
        Ok(())
    }
}

impl<B: Backend> Drop for TerminalChart<B> {
    fn drop(&mut self) {
        if self.owns_screen {
            let _ = restore_terminal();
        }
    }
}

/// Leave the alternate screen and show the cursor again
pub fn restore_terminal() -> io::Result<()> {
    execute!(io::stdout(), LeaveAlternateScreen, Show)
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Tick label for a plotted y value; log-scaled values are labelled as `10^y`
fn y_label(value: f64, log_y: bool) -> String {
    if !log_y {
        return format!("{:.1}", value);
    }
    let real = 10f64.powf(value);
    if real >= 0.1 {
        format!("{:.1}", real)
    } else {
        format!("{:.1e}", real)
    }
}

fn draw(f: &mut Frame, frame: &ChartFrame<'_>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(f.area());

    let series = frame.series();
    let (x, y) = bounds(&series);

    let datasets: Vec<Dataset> = series
        .iter()
        .map(|s| {
            Dataset::default()
                .name(s.quantity.legend())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color(s.quantity.color)))
                .data(&s.points)
        })
        .collect();

    let log_y = frame.options.log_y;
    let y_title = if log_y { "value (log)" } else { "value" };

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" bean-telemetry "),
        )
        .x_axis(
            Axis::default()
                .title("time [s]")
                .bounds(x)
                .labels(vec![
                    Line::from(format!("{:.0}", x[0])),
                    Line::from(format!("{:.0}", x[1])),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(y_title)
                .bounds(y)
                .labels(vec![
                    Line::from(y_label(y[0], log_y)),
                    Line::from(y_label(y[1], log_y)),
                ]),
        )
        .legend_position(Some(LegendPosition::TopLeft))
        .hidden_legend_constraints((Constraint::Percentage(50), Constraint::Percentage(50)));

    f.render_widget(chart, rows[0]);

    let status = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} samples   ", frame.history.len()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(frame.status.unwrap_or("")),
    ]));
    f.render_widget(status, rows[1]);
}
