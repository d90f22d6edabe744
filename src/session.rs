//! Telemetry reading session
//!
//! One session reads lines until the stream closes, an unrecoverable error
//! occurs or Ctrl+C is pressed. Every line is:
//! - timestamped, echoed (verbose) and appended to the daily log (save)
//! - checked against the expected field count (mismatches are reported and skipped)
//! - parsed into the rolling buffers
//! - handed to the presenter

use anyhow::{Context, Result};
use colored::Colorize;
use std::time::Instant;

use crate::chart::{restore_terminal, ChartFrame, ChartOptions, Presenter};
use crate::logfile::DailyLog;
use crate::sensors::SensorLayout;
use crate::serial::LineSource;
use crate::telemetry::{History, SampleLine, TelemetryError};

/// Configuration for a reading session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Enabled sensor groups
    pub layout: SensorLayout,
    /// Samples kept per quantity
    pub history: usize,
    /// Echo every line with its timestamp
    pub verbose: bool,
    /// Daily log to append raw lines to
    pub log: Option<DailyLog>,
    pub chart: ChartOptions,
}

/// What happened to one line
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// Parsed and recorded at `elapsed` seconds into the session
    Accepted { elapsed: f64 },
    /// Wrong number of fields; nothing recorded
    Rejected { expected: usize, found: usize },
}

/// Line counters printed at the end of a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub lines: usize,
    pub accepted: usize,
    pub rejected: usize,
}

/// Telemetry reader with logging and live chart
pub struct Session {
    config: SessionConfig,
    history: History,
    presenter: Box<dyn Presenter>,
    stats: SessionStats,
    status: Option<String>,
}

impl Session {
    /// Create a new session with the given configuration
    pub fn new(config: SessionConfig, presenter: Box<dyn Presenter>) -> Self {
        let history = History::new(config.layout.quantity_count(), config.history);
        Self {
            config,
            history,
            presenter,
            stats: SessionStats::default(),
            status: None,
        }
    }

    #[cfg(test)]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[cfg(test)]
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Read and process lines until the stream closes
    pub fn run(&mut self, source: &mut dyn LineSource) -> Result<()> {
        loop {
            match source.next_line()? {
                Some(raw) => {
                    self.process_line(&SampleLine::new(raw), Instant::now())?;
                }
                None => {
                    log::debug!("telemetry stream closed");
                    break;
                }
            }
        }

        self.presenter.finish()?;
        self.print_summary();
        Ok(())
    }

    /// Process a single line read at `now`
    pub fn process_line(&mut self, sample: &SampleLine, now: Instant) -> Result<LineOutcome> {
        self.stats.lines += 1;

        if self.config.verbose {
            self.report_line(sample);
        }

        // Persisted before validation so malformed lines are kept too
        if let Some(ref log) = self.config.log {
            log.append(sample)?;
        }

        let tokens = sample.tokens();
        let values = match self.config.layout.dispatch(&tokens) {
            Ok(values) => values,
            Err(error) if error.is_recoverable() => {
                self.stats.rejected += 1;
                self.warn(&error);
                return Ok(LineOutcome::Rejected {
                    expected: self.config.layout.expected_fields(),
                    found: tokens.len(),
                });
            }
            Err(error) => {
                return Err(error).with_context(|| format!("Failed to parse line: {}", sample.raw));
            }
        };

        let elapsed = self.history.record(&values, now);
        self.stats.accepted += 1;

        self.presenter.present(&ChartFrame {
            layout: &self.config.layout,
            history: &self.history,
            options: &self.config.chart,
            status: self.status.as_deref(),
        })?;

        Ok(LineOutcome::Accepted { elapsed })
    }

    fn report_line(&mut self, sample: &SampleLine) {
        if self.presenter.is_interactive() {
            self.status = Some(sample.record());
        } else {
            println!("{} {}", sample.stamp().dimmed(), sample.raw);
        }
    }

    fn warn(&mut self, error: &TelemetryError) {
        log::debug!("{}", error);
        if self.presenter.is_interactive() {
            self.status = Some(format!("[WARNING] {}", error));
        } else {
            println!("{} {}", "[WARNING]".yellow().bold(), error);
        }
    }

    /// Print summary statistics
    fn print_summary(&self) {
        println!("\n{}", "=".repeat(70).dimmed());
        println!("{}", "--- Session Summary ---".cyan().bold());
        println!("Total lines: {}", self.stats.lines);
        println!("Accepted: {}", self.stats.accepted.to_string().green());
        println!(
            "Rejected: {}",
            if self.stats.rejected > 0 {
                self.stats.rejected.to_string().yellow().bold().to_string()
            } else {
                self.stats.rejected.to_string()
            }
        );
        if let Some(ref log) = self.config.log {
            println!("Log directory: {}", log.base().join("data").display());
        }
        println!("{}", "=".repeat(70).dimmed());
    }
}

/// Print (and optionally log) every line with its timestamp, unparsed
pub fn echo(source: &mut dyn LineSource, log: Option<&DailyLog>) -> Result<()> {
    while let Some(raw) = source.next_line()? {
        let sample = SampleLine::new(raw);
        println!("{}", sample.record());
        if let Some(log) = log {
            log.append(&sample)?;
        }
    }
    Ok(())
}

/// Exit immediately with status 0 on Ctrl+C
pub fn install_interrupt_handler(restore_screen: bool) -> Result<()> {
    ctrlc::set_handler(move || {
        if restore_screen {
            let _ = restore_terminal();
        }
        println!();
        std::process::exit(0);
    })
    .with_context(|| "Failed to set Ctrl+C handler")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::NullPresenter;
    use crate::sensors::{GroupFlags, QuantitySelection};
    use crate::serial::ReaderSource;
    use chrono::NaiveDate;
    use std::cell::Cell;
    use std::fs;
    use std::io::Cursor;
    use std::rc::Rc;
    use std::time::Duration;
    use tempfile::tempdir;

    fn five_fields() -> SensorLayout {
        SensorLayout::per_quantity(QuantitySelection {
            oxygen: false,
            ..QuantitySelection::all()
        })
    }

    fn config(layout: SensorLayout) -> SessionConfig {
        SessionConfig {
            layout,
            history: 600,
            verbose: false,
            log: None,
            chart: ChartOptions::default(),
        }
    }

    fn sample(raw: &str, second: u32) -> SampleLine {
        let at = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(12, 0, second)
            .unwrap();
        SampleLine::at(raw, at)
    }

    /// Counts frames handed to it
    struct Counting(Rc<Cell<usize>>);

    impl Presenter for Counting {
        fn present(&mut self, _frame: &ChartFrame<'_>) -> Result<()> {
            self.0.set(self.0.get() + 1);
            Ok(())
        }
    }

    fn series(session: &Session, index: usize) -> Vec<f64> {
        session.history().series(index).unwrap().iter().collect()
    }

    #[test]
    fn test_valid_line_fills_every_buffer() {
        let mut session = Session::new(config(five_fields()), Box::new(NullPresenter));

        let outcome = session
            .process_line(&sample("21.5 45.2 10.1 1013.2 3.7", 0), Instant::now())
            .unwrap();

        assert_eq!(outcome, LineOutcome::Accepted { elapsed: 0.0 });
        assert_eq!(series(&session, 0), vec![21.5]);
        assert_eq!(series(&session, 1), vec![45.2]);
        assert_eq!(series(&session, 2), vec![10.1]);
        assert_eq!(series(&session, 3), vec![1013.2]);
        assert_eq!(series(&session, 4), vec![3.7]);
        assert_eq!(session.history().times().len(), 1);
    }

    #[test]
    fn test_short_line_is_rejected() {
        let frames = Rc::new(Cell::new(0));
        let mut session = Session::new(config(five_fields()), Box::new(Counting(frames.clone())));

        let outcome = session
            .process_line(&sample("21.5 45.2", 0), Instant::now())
            .unwrap();

        assert_eq!(outcome, LineOutcome::Rejected { expected: 5, found: 2 });
        assert!(session.history().is_empty());
        for index in 0..5 {
            assert!(series(&session, index).is_empty());
        }
        assert_eq!(frames.get(), 0);
        assert_eq!(session.stats().rejected, 1);
    }

    #[test]
    fn test_unbounded_history_counts_mismatch_once() {
        let mut cfg = config(five_fields());
        cfg.history = usize::MAX;
        let mut session = Session::new(cfg, Box::new(NullPresenter));
        let t0 = Instant::now();

        let rejected = session.process_line(&sample("21.5", 0), t0).unwrap();
        let accepted = session
            .process_line(&sample("21.5 45.2 10.1 1013.2 3.7", 1), t0)
            .unwrap();

        assert_eq!(rejected, LineOutcome::Rejected { expected: 5, found: 1 });
        assert_eq!(accepted, LineOutcome::Accepted { elapsed: 0.0 });
        assert_eq!(
            session.stats(),
            SessionStats {
                lines: 2,
                accepted: 1,
                rejected: 1
            }
        );
        assert_eq!(series(&session, 3), vec![1013.2]);
    }

    #[test]
    fn test_rejection_keeps_earlier_samples() {
        let layout = SensorLayout::legacy(GroupFlags {
            bme: false,
            sht: true,
            ox2: false,
        });
        let frames = Rc::new(Cell::new(0));
        let mut session = Session::new(config(layout), Box::new(Counting(frames.clone())));
        let t0 = Instant::now();

        session.process_line(&sample("20.0 50.0 9.0 24.0 3.3", 0), t0).unwrap();
        session.process_line(&sample("20.1 50.1 9.1 24.1", 1), t0 + Duration::from_secs(1)).unwrap();
        session.process_line(&sample("20.2 50.2 9.2 24.2 3.2", 2), t0 + Duration::from_secs(2)).unwrap();

        assert_eq!(series(&session, 0), vec![20.0, 20.2]);
        assert_eq!(series(&session, 4), vec![3.3, 3.2]);
        assert_eq!(session.history().times().iter().collect::<Vec<_>>(), vec![0.0, 2.0]);
        assert_eq!(frames.get(), 2);
        assert_eq!(
            session.stats(),
            SessionStats {
                lines: 3,
                accepted: 2,
                rejected: 1
            }
        );
    }

    #[test]
    fn test_clock_starts_at_first_accepted_line() {
        let mut session = Session::new(config(five_fields()), Box::new(NullPresenter));
        let t0 = Instant::now();

        session.process_line(&sample("noise", 0), t0).unwrap();
        let first = session
            .process_line(&sample("1 2 3 4 5", 1), t0 + Duration::from_secs(3))
            .unwrap();
        let second = session
            .process_line(&sample("1 2 3 4 5", 2), t0 + Duration::from_secs(4))
            .unwrap();

        assert_eq!(first, LineOutcome::Accepted { elapsed: 0.0 });
        assert_eq!(second, LineOutcome::Accepted { elapsed: 1.0 });
    }

    #[test]
    fn test_bad_number_is_fatal() {
        let mut session = Session::new(config(five_fields()), Box::new(NullPresenter));

        let err = session
            .process_line(&sample("21.5 45.2 nan? 1013.2 3.7", 0), Instant::now())
            .unwrap_err();

        match err.downcast_ref::<TelemetryError>() {
            Some(TelemetryError::InvalidNumber { position, .. }) => assert_eq!(*position, 2),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_save_logs_every_line() {
        let dir = tempdir().unwrap();
        let mut cfg = config(five_fields());
        cfg.log = Some(DailyLog::new(dir.path()));
        let mut session = Session::new(cfg, Box::new(NullPresenter));
        let t0 = Instant::now();

        let lines = [
            "21.5 45.2 10.1 1013.2 3.7",
            "21.5 45.2",
            "21.6 45.1 10.0 1013.3 3.7",
            "",
        ];
        for (i, line) in lines.iter().enumerate() {
            session
                .process_line(&sample(line, i as u32), t0 + Duration::from_secs(i as u64))
                .unwrap();
        }

        let path = dir.path().join("data/2024/03/20240307.log");
        let content = fs::read_to_string(path).unwrap();
        let records: Vec<&str> = content.lines().collect();
        assert_eq!(records.len(), lines.len());
        for (i, (record, line)) in records.iter().zip(lines).enumerate() {
            assert_eq!(*record, format!("202403071200{:02} {}", i, line));
        }
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_run_until_stream_closes() {
        let mut session = Session::new(config(five_fields()), Box::new(NullPresenter));
        let mut source = ReaderSource::new(Cursor::new(
            "21.5 45.2 10.1 1013.2 3.7\r\n\n21.6 45.1 10.0 1013.3 3.6\r\n",
        ));

        session.run(&mut source).unwrap();

        assert_eq!(
            session.stats(),
            SessionStats {
                lines: 3,
                accepted: 2,
                rejected: 1
            }
        );
        assert_eq!(series(&session, 4), vec![3.7, 3.6]);
    }

    #[test]
    fn test_run_stops_on_decode_error() {
        let mut session = Session::new(config(five_fields()), Box::new(NullPresenter));
        let mut source = ReaderSource::new(Cursor::new(b"1 2 3 4 5\n\xff\xfe\n1 2 3 4 5\n".to_vec()));

        let err = session.run(&mut source).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TelemetryError>(),
            Some(TelemetryError::Decode(_))
        ));
        assert_eq!(session.stats().accepted, 1);
    }

    #[test]
    fn test_echo_logs_raw_lines() {
        let dir = tempdir().unwrap();
        let log = DailyLog::new(dir.path());
        let mut source = ReaderSource::new(Cursor::new("hello bean\n1 2\n"));

        echo(&mut source, Some(&log)).unwrap();

        let day = fs::read_dir(dir.path().join("data")).unwrap().count();
        assert_eq!(day, 1);
    }
}
