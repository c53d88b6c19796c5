//! Offline analysis of logged session CSV files.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context};
use itertools::{Itertools, MinMaxResult};

use crate::counter::Phase;
use crate::num::TotalF32;

/// Aggregate statistics over one logged session.
#[derive(Debug, Clone)]
pub struct WorkoutSummary {
    pub total_frames: u64,
    pub detected_frames: u64,
    /// Highest rep count seen in the log.
    pub total_reps: u32,
    /// Mean angle over frames with a reading, in degrees.
    pub mean_angle: Option<f32>,
    /// Minimum angle (maximum contraction), in degrees.
    pub min_angle: Option<f32>,
    /// Maximum angle (maximum extension), in degrees.
    pub max_angle: Option<f32>,
    pub up_frames: u64,
    pub down_frames: u64,
}

impl WorkoutSummary {
    pub fn detection_rate(&self) -> f32 {
        if self.total_frames == 0 {
            0.0
        } else {
            self.detected_frames as f32 / self.total_frames as f32
        }
    }
}

impl fmt::Display for WorkoutSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "workout summary")?;
        writeln!(f, "  total frames: {}", self.total_frames)?;
        writeln!(
            f,
            "  frames with pose detected: {} ({:.1}%)",
            self.detected_frames,
            self.detection_rate() * 100.0
        )?;
        writeln!(f, "  total reps completed: {}", self.total_reps)?;
        match (self.mean_angle, self.min_angle, self.max_angle) {
            (Some(mean), Some(min), Some(max)) => {
                writeln!(f, "  average angle: {mean:.2}°")?;
                writeln!(f, "  min angle (max contraction): {min:.2}°")?;
                writeln!(f, "  max angle (max extension): {max:.2}°")?;
            }
            _ => writeln!(f, "  no angle readings")?,
        }
        let pct = |frames: u64| {
            if self.total_frames == 0 {
                0.0
            } else {
                frames as f32 / self.total_frames as f32 * 100.0
            }
        };
        write!(
            f,
            "  phase distribution: up {} frames ({:.1}%), down {} frames ({:.1}%)",
            self.up_frames,
            pct(self.up_frames),
            self.down_frames,
            pct(self.down_frames),
        )
    }
}

/// One parsed CSV row. Only the fields the summary needs are retained.
struct Row {
    rep_count: u32,
    phase: Phase,
    angle: Option<f32>,
    pose_detected: bool,
}

fn parse_row(line: &str) -> anyhow::Result<Row> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 6 {
        bail!("expected 6 fields, found {}", fields.len());
    }
    let (rep_count, state, angle, pose_detected) = (fields[2], fields[3], fields[4], fields[5]);

    let angle = match angle {
        "N/A" | "" => None,
        _ => Some(angle.parse::<f32>().context("unparsable angle")?),
    };
    // The reference logger this format comes from wrote Python booleans.
    let pose_detected = match pose_detected.trim() {
        s if s.eq_ignore_ascii_case("true") => true,
        s if s.eq_ignore_ascii_case("false") => false,
        s => bail!("unparsable pose_detected value `{s}`"),
    };

    Ok(Row {
        rep_count: rep_count.parse().context("unparsable rep_count")?,
        phase: state.parse()?,
        angle,
        pose_detected,
    })
}

/// Summarizes a session log read from `reader`.
///
/// The first line must be the header. `N/A` angles are treated as missing
/// readings; any otherwise malformed row is an error.
pub fn summarize(reader: impl BufRead) -> anyhow::Result<WorkoutSummary> {
    let mut lines = reader.lines();
    lines
        .next()
        .context("empty log file (missing header)")?
        .context("failed to read header")?;

    let mut rows = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line = line.context("failed to read log file")?;
        if line.is_empty() {
            continue;
        }
        // Header is line 1, so data rows start at line 2.
        let row = parse_row(&line).with_context(|| format!("malformed record on line {}", idx + 2))?;
        rows.push(row);
    }

    let angles = || rows.iter().filter_map(|row| row.angle);
    let readings = angles().count();
    let (min_angle, max_angle) = match angles().map(TotalF32).minmax() {
        MinMaxResult::NoElements => (None, None),
        MinMaxResult::OneElement(v) => (Some(v.0), Some(v.0)),
        MinMaxResult::MinMax(min, max) => (Some(min.0), Some(max.0)),
    };
    let mean_angle = (readings > 0).then(|| angles().sum::<f32>() / readings as f32);

    Ok(WorkoutSummary {
        total_frames: rows.len() as u64,
        detected_frames: rows.iter().filter(|row| row.pose_detected).count() as u64,
        total_reps: rows.iter().map(|row| row.rep_count).max().unwrap_or(0),
        mean_angle,
        min_angle,
        max_angle,
        up_frames: rows.iter().filter(|row| row.phase == Phase::Up).count() as u64,
        down_frames: rows.iter().filter(|row| row.phase == Phase::Down).count() as u64,
    })
}

/// Summarizes the session log at `path`.
pub fn summarize_file(path: impl AsRef<Path>) -> anyhow::Result<WorkoutSummary> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("failed to open log file `{}`", path.display()))?;
    summarize(BufReader::new(file))
        .with_context(|| format!("failed to analyze `{}`", path.display()))
}
