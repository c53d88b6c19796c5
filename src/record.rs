//! Per-frame session records and CSV persistence.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::counter::Phase;

/// Rows are flushed to disk every this many records, and on drop.
const FLUSH_INTERVAL: u64 = 30;

const HEADER: &str = "frame_number,timestamp,rep_count,state,angle,pose_detected";

/// Everything the session knows about one processed frame.
#[derive(Debug, Clone)]
pub struct FrameRecord {
    pub frame_number: u64,
    /// Local wall-clock time with millisecond precision.
    pub timestamp: String,
    pub rep_count: u32,
    pub phase: Phase,
    /// `None` when no angle could be computed this frame.
    pub angle: Option<f32>,
    pub pose_detected: bool,
}

impl FrameRecord {
    /// Builds a record for the current instant.
    pub fn now(frame_number: u64, rep_count: u32, phase: Phase, angle: Option<f32>, pose_detected: bool) -> Self {
        Self {
            frame_number,
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            rep_count,
            phase,
            angle,
            pose_detected,
        }
    }

    fn write_row(&self, mut w: impl Write) -> std::io::Result<()> {
        write!(w, "{},{},{},{},", self.frame_number, self.timestamp, self.rep_count, self.phase)?;
        match self.angle {
            Some(angle) => write!(w, "{angle:.2}")?,
            None => w.write_all(b"N/A")?,
        }
        writeln!(w, ",{}", self.pose_detected)
    }
}

/// Consumes one [`FrameRecord`] per processed frame.
pub trait FrameLogger {
    fn log(&mut self, record: &FrameRecord) -> anyhow::Result<()>;
}

impl<L: FrameLogger + ?Sized> FrameLogger for Box<L> {
    fn log(&mut self, record: &FrameRecord) -> anyhow::Result<()> {
        (**self).log(record)
    }
}

/// Discards all records.
impl FrameLogger for () {
    fn log(&mut self, _record: &FrameRecord) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Appends frame records to a CSV file, one row per frame.
///
/// Column layout: `frame_number, timestamp, rep_count, state, angle,
/// pose_detected`, with `state` as `up`/`down` and `angle` as a 2-decimal
/// degree value or the literal `N/A`. None of the fields can contain commas
/// or quotes, so no escaping is needed.
pub struct CsvLogger {
    writer: BufWriter<File>,
    path: PathBuf,
    rows: u64,
}

impl CsvLogger {
    /// Starts a new log file at `path`, truncating any existing file and
    /// writing the header row.
    pub fn create(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("failed to create log file `{}`", path.display()))?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{HEADER}")?;
        writer.flush()?;
        Ok(Self {
            writer,
            path: path.to_owned(),
            rows: 0,
        })
    }

    /// Appends to an existing log file at `path`, or starts a new one (with
    /// header) if the file is missing or empty.
    pub fn append(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open log file `{}`", path.display()))?;
        let needs_header = file.metadata()?.len() == 0;
        let mut writer = BufWriter::new(file);
        if needs_header {
            writeln!(writer, "{HEADER}")?;
            writer.flush()?;
        }
        Ok(Self {
            writer,
            path: path.to_owned(),
            rows: 0,
        })
    }

    /// Number of rows logged through this logger instance.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Flushes all buffered rows and closes the logger.
    ///
    /// Dropping the logger also flushes, but swallows I/O errors; call this
    /// when they matter.
    pub fn finish(mut self) -> anyhow::Result<()> {
        self.writer.flush()?;
        log::info!("frame data saved to `{}` ({} rows)", self.path.display(), self.rows);
        Ok(())
    }
}

impl FrameLogger for CsvLogger {
    fn log(&mut self, record: &FrameRecord) -> anyhow::Result<()> {
        record
            .write_row(&mut self.writer)
            .with_context(|| format!("failed to write to log file `{}`", self.path.display()))?;
        self.rows += 1;
        if self.rows % FLUSH_INTERVAL == 0 {
            self.writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for CsvLogger {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}
