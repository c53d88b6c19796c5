//! Repetition counting over a stream of joint angle samples.

use std::fmt;

/// Default extension threshold in degrees (arm considered fully extended).
pub const DEFAULT_UP_THRESHOLD: f32 = 160.0;
/// Default contraction threshold in degrees (arm considered fully curled).
pub const DEFAULT_DOWN_THRESHOLD: f32 = 70.0;

/// Which threshold the counter most recently crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The joint angle last exceeded the *up* threshold (full extension).
    Up,
    /// Initial phase; the angle last dropped below the *down* threshold.
    Down,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Up => f.write_str("up"),
            Phase::Down => f.write_str("down"),
        }
    }
}

/// Error returned when parsing an unrecognized phase name.
#[derive(Debug, thiserror::Error)]
#[error("unknown phase `{0}`")]
pub struct ParsePhaseError(String);

impl std::str::FromStr for Phase {
    type Err = ParsePhaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Phase::Up),
            "down" => Ok(Phase::Down),
            _ => Err(ParsePhaseError(s.to_owned())),
        }
    }
}

/// Error returned by [`RepCounter::new`] for unusable threshold pairs.
#[derive(Debug, thiserror::Error)]
#[error("invalid rep thresholds: down ({down}°) must be below up ({up}°)")]
pub struct InvalidThresholds {
    up: f32,
    down: f32,
}

/// Counts exercise repetitions from joint angle samples.
///
/// A repetition is a full cycle: the angle must first exceed the *up*
/// threshold and later drop below the *down* threshold. The gap between the
/// two thresholds is hysteresis — jitter around a single boundary can never
/// produce spurious counts.
///
/// Missing samples (`None`, e.g. the person left the frame) hold the current
/// phase, so brief occlusion does not corrupt the count.
#[derive(Debug, Clone)]
pub struct RepCounter {
    up_threshold: f32,
    down_threshold: f32,
    rep_count: u32,
    phase: Phase,
}

impl RepCounter {
    /// Creates a counter with the given thresholds, starting in [`Phase::Down`]
    /// with a count of 0.
    ///
    /// Fails if `down_threshold >= up_threshold` or either value is
    /// non-finite: such a counter could never leave its initial phase.
    pub fn new(up_threshold: f32, down_threshold: f32) -> Result<Self, InvalidThresholds> {
        if !(down_threshold < up_threshold)
            || !up_threshold.is_finite()
            || !down_threshold.is_finite()
        {
            return Err(InvalidThresholds {
                up: up_threshold,
                down: down_threshold,
            });
        }

        Ok(Self {
            up_threshold,
            down_threshold,
            rep_count: 0,
            phase: Phase::Down,
        })
    }

    /// Feeds the next angle sample, returning `true` iff this sample
    /// completed a repetition.
    ///
    /// `None` (no reading) never changes phase or count.
    pub fn update(&mut self, angle: Option<f32>) -> bool {
        let Some(angle) = angle else {
            return false;
        };

        match self.phase {
            Phase::Down if angle > self.up_threshold => {
                self.phase = Phase::Up;
                false
            }
            Phase::Up if angle < self.down_threshold => {
                self.phase = Phase::Down;
                self.rep_count += 1;
                true
            }
            _ => false,
        }
    }

    /// Resets count and phase to their initial values, keeping the
    /// configured thresholds.
    pub fn reset(&mut self) {
        self.rep_count = 0;
        self.phase = Phase::Down;
    }

    /// The number of completed repetitions. Never decreases except via
    /// [`RepCounter::reset`].
    #[inline]
    pub fn count(&self) -> u32 {
        self.rep_count
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn up_threshold(&self) -> f32 {
        self.up_threshold
    }

    #[inline]
    pub fn down_threshold(&self) -> f32 {
        self.down_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> RepCounter {
        RepCounter::new(160.0, 70.0).unwrap()
    }

    fn feed(counter: &mut RepCounter, angles: &[f32]) -> u32 {
        angles
            .iter()
            .filter(|&&a| counter.update(Some(a)))
            .count() as u32
    }

    #[test]
    fn single_rep() {
        let mut c = counter();
        assert!(!c.update(Some(50.0)));
        assert!(!c.update(Some(170.0)));
        assert!(!c.update(Some(170.0)));
        assert!(c.update(Some(60.0)));
        assert_eq!(c.count(), 1);
        assert_eq!(c.phase(), Phase::Down);
    }

    #[test]
    fn no_rep_without_down_crossing() {
        let mut c = counter();
        assert_eq!(feed(&mut c, &[170.0, 170.0, 170.0, 170.0]), 0);
        assert_eq!(c.count(), 0);
        assert_eq!(c.phase(), Phase::Up);
    }

    #[test]
    fn two_full_cycles() {
        let mut c = counter();
        assert_eq!(feed(&mut c, &[170.0, 60.0, 170.0, 60.0]), 2);
        assert_eq!(c.count(), 2);
    }

    #[test]
    fn missing_samples_hold_state() {
        let mut c = counter();
        for _ in 0..100 {
            assert!(!c.update(None));
        }
        assert_eq!(c.count(), 0);
        assert_eq!(c.phase(), Phase::Down);

        // A detection gap in the middle of a rep does not lose it.
        c.update(Some(170.0));
        c.update(None);
        c.update(None);
        assert!(c.update(Some(60.0)));
        assert_eq!(c.count(), 1);
    }

    #[test]
    fn angles_inside_hysteresis_band_are_inert() {
        let mut c = counter();
        assert_eq!(feed(&mut c, &[100.0, 120.0, 150.0, 80.0]), 0);
        assert_eq!(c.phase(), Phase::Down);
    }

    #[test]
    fn accessors_are_idempotent() {
        let mut c = counter();
        feed(&mut c, &[170.0, 60.0]);
        for _ in 0..3 {
            assert_eq!(c.count(), 1);
            assert_eq!(c.phase(), Phase::Down);
        }
    }

    #[test]
    fn reset_preserves_thresholds() {
        let mut c = counter();
        feed(&mut c, &[170.0, 60.0]);
        c.reset();
        assert_eq!(c.count(), 0);
        assert_eq!(c.phase(), Phase::Down);
        assert_eq!(c.up_threshold(), 160.0);
        assert_eq!(c.down_threshold(), 70.0);

        // Still functional after reset.
        assert_eq!(feed(&mut c, &[170.0, 60.0]), 1);
    }

    #[test]
    fn rejects_inverted_or_equal_thresholds() {
        assert!(RepCounter::new(70.0, 160.0).is_err());
        assert!(RepCounter::new(100.0, 100.0).is_err());
        assert!(RepCounter::new(f32::NAN, 70.0).is_err());
        assert!(RepCounter::new(f32::INFINITY, 70.0).is_err());
    }

    #[test]
    fn threshold_crossings_are_strict() {
        let mut c = counter();
        // Exactly at the thresholds: no transitions.
        assert_eq!(feed(&mut c, &[160.0]), 0);
        assert_eq!(c.phase(), Phase::Down);
        c.update(Some(170.0));
        assert_eq!(feed(&mut c, &[70.0]), 0);
        assert_eq!(c.phase(), Phase::Up);
    }
}
