//! Blocking line sources
//!
//! A line source yields one decoded, trimmed telemetry line per call and
//! blocks until it has one. Read timeouts are waited out; any other I/O
//! error and any invalid UTF-8 ends the session.

use std::io::{BufRead, ErrorKind};

use crate::telemetry::TelemetryError;

/// Anything that produces telemetry lines
pub trait LineSource {
    /// Next line, or `None` once the stream is closed
    fn next_line(&mut self) -> Result<Option<String>, TelemetryError>;
}

/// Line source over any buffered reader (device node, file, pipe)
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn next_line(&mut self) -> Result<Option<String>, TelemetryError> {
        read_record(&mut self.reader)
    }
}

/// Read up to and including the next newline, waiting out read timeouts
pub(crate) fn read_record<R: BufRead + ?Sized>(
    reader: &mut R,
) -> Result<Option<String>, TelemetryError> {
    let mut buffer = Vec::new();

    loop {
        match reader.read_until(b'\n', &mut buffer) {
            Ok(_) => break,
            // bytes read before the timeout stay in `buffer`
            Err(ref e) if e.kind() == ErrorKind::TimedOut => continue,
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    if buffer.is_empty() {
        return Ok(None);
    }

    decode_line(buffer).map(Some)
}

/// Strict UTF-8 decode, surrounding whitespace (including `\r\n`) removed
pub(crate) fn decode_line(bytes: Vec<u8>) -> Result<String, TelemetryError> {
    let text = String::from_utf8(bytes)?;
    Ok(text.trim().to_string())
}
