//! Exercise repetition counting from pose landmark streams.
//!
//! The crate never touches pixels: pose detection is an external capability
//! implementing [`PoseSource`], which maps a video frame to a set of named 2D
//! body landmarks (or nothing, when no person is visible). From there,
//! [`Session`] extracts a joint triple per frame, computes the joint angle,
//! and feeds it to a [`RepCounter`] — a two-threshold hysteresis state
//! machine that turns the angle stream into repetition counts.
//!
//! # Coordinates
//!
//! Landmark positions are normalized image coordinates: X points right, Y
//! points *down*, both in `[0, 1]` for on-screen points. The angle
//! computation is invariant to scale and handedness, so any consistent 2D
//! frame works.
//!
//! [`PoseSource`]: pose::PoseSource
//! [`Session`]: session::Session
//! [`RepCounter`]: counter::RepCounter

use log::LevelFilter;

pub mod analysis;
pub mod angle;
pub mod counter;
pub mod landmark;
pub mod num;
pub mod pose;
pub mod record;
pub mod session;
pub mod timer;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = LevelFilter::Debug;
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_PKG_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// The calling crate and this library will log at *debug* level; everything
/// else follows `RUST_LOG`.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
