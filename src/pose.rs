//! The pose detection capability.

use crate::landmark::Landmarks;

/// Detects body pose landmarks in video frames of type `F`.
///
/// Implementations wrap whatever detection backend is in use (a neural
/// network, a remote service, recorded data). `None` means no person was
/// detected in the frame — the expected outcome for empty frames, not an
/// error.
pub trait PoseSource<F> {
    fn detect(&mut self, frame: &F) -> Option<Landmarks>;
}

impl<F, S: PoseSource<F> + ?Sized> PoseSource<F> for Box<S> {
    fn detect(&mut self, frame: &F) -> Option<Landmarks> {
        (**self).detect(frame)
    }
}

impl<F, S: PoseSource<F> + ?Sized> PoseSource<F> for &mut S {
    fn detect(&mut self, frame: &F) -> Option<Landmarks> {
        (**self).detect(frame)
    }
}
