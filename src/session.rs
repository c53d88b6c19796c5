//! The per-frame processing loop.
//!
//! A [`Session`] owns the only piece of cross-frame state (the
//! [`RepCounter`]) and drives, for every frame: pose detection → arm angle →
//! counter update → record logging → frame annotation. Detection and drawing
//! are injected capabilities, so the loop runs unchanged against a webcam, a
//! video file, or scripted test data.

use std::fmt;

use crate::angle::{joint_angle, Point};
use crate::counter::{InvalidThresholds, Phase, RepCounter, DEFAULT_DOWN_THRESHOLD, DEFAULT_UP_THRESHOLD};
use crate::landmark::{arm_triple, Landmarks, Side};
use crate::pose::PoseSource;
use crate::record::{FrameLogger, FrameRecord};
use crate::timer::FpsCounter;

/// Session parameters.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Which arm to track.
    pub side: Side,
    /// Angle above which the arm counts as fully extended, in degrees.
    pub up_threshold: f32,
    /// Angle below which the arm counts as fully curled, in degrees.
    pub down_threshold: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            side: Side::Right,
            up_threshold: DEFAULT_UP_THRESHOLD,
            down_threshold: DEFAULT_DOWN_THRESHOLD,
        }
    }
}

/// Per-frame data handed to a [`FrameAnnotator`] for drawing.
#[derive(Debug)]
pub struct Overlay<'a> {
    /// Detected landmarks, if any. Skeleton drawing can use
    /// [`COARSE_CONNECTIVITY`](crate::landmark::COARSE_CONNECTIVITY).
    pub landmarks: Option<&'a Landmarks>,
    pub rep_count: u32,
    pub phase: Phase,
    /// The tracked joint angle, if one could be computed this frame.
    pub angle: Option<f32>,
    /// Position of the tracked elbow, as an anchor for the angle label.
    pub angle_anchor: Option<Point>,
}

/// Draws session state onto frames of type `F`.
pub trait FrameAnnotator<F> {
    fn annotate(&mut self, frame: &mut F, overlay: &Overlay<'_>);
}

impl<F, A: FrameAnnotator<F> + ?Sized> FrameAnnotator<F> for Box<A> {
    fn annotate(&mut self, frame: &mut F, overlay: &Overlay<'_>) {
        (**self).annotate(frame, overlay);
    }
}

/// Draws nothing.
impl<F> FrameAnnotator<F> for () {
    fn annotate(&mut self, _frame: &mut F, _overlay: &Overlay<'_>) {}
}

/// Totals reported when a session ends.
#[derive(Debug, Clone, Copy)]
pub struct SessionSummary {
    pub frames: u64,
    pub reps: u32,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "session complete: {} reps over {} frames",
            self.reps, self.frames
        )
    }
}

/// A repetition counting session over a stream of video frames.
pub struct Session<S, L, A> {
    source: S,
    logger: L,
    annotator: A,
    counter: RepCounter,
    side: Side,
    frame_number: u64,
    fps: FpsCounter,
}

impl<S, L: FrameLogger, A> Session<S, L, A> {
    /// Creates a session. Fails if the configured thresholds are invalid.
    pub fn new(config: SessionConfig, source: S, logger: L, annotator: A) -> Result<Self, InvalidThresholds> {
        Ok(Self {
            source,
            logger,
            annotator,
            counter: RepCounter::new(config.up_threshold, config.down_threshold)?,
            side: config.side,
            frame_number: 0,
            fps: FpsCounter::new("session"),
        })
    }

    #[inline]
    pub fn counter(&self) -> &RepCounter {
        &self.counter
    }

    /// Processes a single frame: detect, compute the arm angle, update the
    /// counter, log a record, annotate the frame.
    ///
    /// Missing detections and degenerate geometry flow through as "no
    /// reading": the counter holds its phase and the record carries no angle.
    pub fn process_frame<F>(&mut self, frame: &mut F) -> anyhow::Result<()>
    where
        S: PoseSource<F>,
        A: FrameAnnotator<F>,
    {
        let landmarks = self.source.detect(frame);
        let angle = landmarks.as_ref().and_then(|lm| {
            let (shoulder, elbow, wrist) = arm_triple(lm, self.side);
            joint_angle(shoulder, elbow, wrist)
        });

        if self.counter.update(angle) {
            log::debug!("rep {} completed at frame {}", self.counter.count(), self.frame_number);
        }

        let record = FrameRecord::now(
            self.frame_number,
            self.counter.count(),
            self.counter.phase(),
            angle,
            landmarks.is_some(),
        );
        self.logger.log(&record)?;

        let overlay = Overlay {
            landmarks: landmarks.as_ref(),
            rep_count: self.counter.count(),
            phase: self.counter.phase(),
            angle,
            angle_anchor: landmarks.as_ref().map(|lm| lm.position(self.side.elbow())),
        };
        self.annotator.annotate(frame, &overlay);

        self.frame_number += 1;
        self.fps.tick();
        Ok(())
    }

    /// Runs the session to the end of the frame stream and reports totals.
    ///
    /// The totals are cumulative over the session, including frames processed
    /// by earlier calls to [`Session::process_frame`].
    pub fn run<F, I>(&mut self, frames: I) -> anyhow::Result<SessionSummary>
    where
        S: PoseSource<F>,
        A: FrameAnnotator<F>,
        I: IntoIterator<Item = anyhow::Result<F>>,
    {
        for frame in frames {
            let mut frame = frame?;
            self.process_frame(&mut frame)?;
        }

        let summary = SessionSummary {
            frames: self.frame_number,
            reps: self.counter.count(),
        };
        log::info!("{summary}");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use crate::landmark::{LandmarkIdx, NUM_POSE_LANDMARKS};

    use super::*;

    /// A frame is a scripted right-arm angle, or `None` for "nobody visible".
    struct ScriptedPose;

    impl PoseSource<Option<f32>> for ScriptedPose {
        fn detect(&mut self, frame: &Option<f32>) -> Option<Landmarks> {
            frame.map(landmarks_with_right_arm_angle)
        }
    }

    /// Places shoulder/elbow/wrist so the right elbow angle equals `degrees`.
    fn landmarks_with_right_arm_angle(degrees: f32) -> Landmarks {
        let elbow = [0.5, 0.5];
        let shoulder = [0.3, 0.5];
        let dir = std::f32::consts::PI - degrees.to_radians();
        let wrist = [elbow[0] + 0.2 * dir.cos(), elbow[1] + 0.2 * dir.sin()];

        let mut lm = Landmarks::new(NUM_POSE_LANDMARKS);
        lm.set(LandmarkIdx::RightShoulder as usize, crate::landmark::Landmark::new(shoulder));
        lm.set(LandmarkIdx::RightElbow as usize, crate::landmark::Landmark::new(elbow));
        lm.set(LandmarkIdx::RightWrist as usize, crate::landmark::Landmark::new(wrist));
        lm
    }

    #[derive(Default)]
    struct CapturingLogger(Vec<FrameRecord>);

    impl FrameLogger for CapturingLogger {
        fn log(&mut self, record: &FrameRecord) -> anyhow::Result<()> {
            self.0.push(record.clone());
            Ok(())
        }
    }

    #[test]
    fn scripted_session_counts_reps_and_logs_every_frame() {
        let mut session = Session::new(
            SessionConfig::default(),
            ScriptedPose,
            CapturingLogger::default(),
            (),
        )
        .unwrap();

        let script: [Option<f32>; 7] = [
            Some(50.0),
            Some(170.0),
            None, // detection gap mid-rep
            Some(170.0),
            Some(60.0),
            Some(170.0),
            Some(60.0),
        ];
        let summary = session.run(script.into_iter().map(Ok)).unwrap();

        assert_eq!(summary.frames, 7);
        assert_eq!(summary.reps, 2);
        assert_eq!(session.counter().phase(), Phase::Down);

        let records = &session.logger.0;
        assert_eq!(records.len(), 7);
        assert_eq!(records[2].angle, None);
        assert!(!records[2].pose_detected);
        assert_eq!(records[2].phase, Phase::Up);
        assert_eq!(records[4].rep_count, 1);
        assert_eq!(records[6].rep_count, 2);
        assert!((records[1].angle.unwrap() - 170.0).abs() < 0.1);
        assert_eq!(
            records
                .iter()
                .map(|r| r.frame_number)
                .collect::<Vec<_>>(),
            (0..7).collect::<Vec<_>>()
        );
    }

    #[test]
    fn undetected_stream_makes_no_progress() {
        let mut session =
            Session::new(SessionConfig::default(), ScriptedPose, CapturingLogger::default(), ())
                .unwrap();

        let summary = session
            .run((0..5).map(|_| Ok(None::<f32>)))
            .unwrap();
        assert_eq!(summary.reps, 0);
        assert_eq!(session.counter().phase(), Phase::Down);
        assert!(session.logger.0.iter().all(|r| !r.pose_detected && r.angle.is_none()));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SessionConfig {
            up_threshold: 70.0,
            down_threshold: 160.0,
            ..Default::default()
        };
        assert!(Session::new(config, ScriptedPose, (), ()).is_err());
    }
}
