//! Body pose landmark types.
//!
//! Landmarks follow the 33-point BlazePose layout ([`LandmarkIdx`]), with
//! positions in normalized image coordinates.

use crate::angle::Point;

/// Number of body pose landmarks in the standard layout.
pub const NUM_POSE_LANDMARKS: usize = 33;

/// A set of body landmark positions reported for one frame.
#[derive(Debug, Clone)]
pub struct Landmarks {
    positions: Box<[Point]>,
    visibility: Option<Box<[f32]>>,
}

impl Landmarks {
    /// Creates a new [`Landmarks`] collection containing `len` preallocated
    /// landmarks.
    ///
    /// All landmarks will start with all coordinates at `0.0`.
    pub fn new(len: usize) -> Self {
        Self {
            positions: vec![[0.0, 0.0]; len].into_boxed_slice(),
            visibility: None,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Landmark> + Clone + '_ {
        (0..self.positions.len()).map(|i| self.get(i))
    }

    pub fn get(&self, index: usize) -> Landmark {
        let mut lm = Landmark::new(self.positions[index]);
        if let Some(vis) = &self.visibility {
            lm = lm.with_visibility(vis[index]);
        }
        lm
    }

    pub fn set(&mut self, index: usize, landmark: Landmark) {
        let len = self.positions.len();
        self.positions[index] = landmark.pos;
        if let Some(vis) = landmark.visibility {
            self.visibility.get_or_insert_with(|| vec![0.0; len].into())[index] = vis;
        }
    }

    /// Position of a named pose landmark.
    pub fn position(&self, idx: LandmarkIdx) -> Point {
        self.positions[idx as usize]
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }
}

/// A single 2D body landmark.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Landmark {
    pos: Point,
    visibility: Option<f32>,
}

impl Landmark {
    pub fn new(position: Point) -> Self {
        Self {
            pos: position,
            visibility: None,
        }
    }

    pub fn with_visibility(self, visibility: f32) -> Self {
        Self {
            visibility: Some(visibility),
            ..self
        }
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.pos
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos[0]
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.pos[1]
    }

    #[inline]
    pub fn visibility(&self) -> Option<f32> {
        self.visibility
    }
}

/// Names of the 33 standard body pose landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkIdx {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

/// Skeleton edges for overlay drawing.
pub const COARSE_CONNECTIVITY: &[(LandmarkIdx, LandmarkIdx)] = {
    use LandmarkIdx::*;
    &[
        (LeftShoulder, RightShoulder),
        (LeftShoulder, LeftElbow),
        (LeftElbow, LeftWrist),
        (RightShoulder, RightElbow),
        (RightElbow, RightWrist),
        (LeftShoulder, LeftHip),
        (LeftHip, LeftAnkle),
        (LeftAnkle, LeftHeel),
        (LeftAnkle, LeftFootIndex),
        (RightShoulder, RightHip),
        (RightHip, RightAnkle),
        (RightAnkle, RightHeel),
        (RightAnkle, RightFootIndex),
    ]
};

/// Which arm the session tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// The (shoulder, elbow, wrist) landmark indices for this side.
    pub fn arm(self) -> (LandmarkIdx, LandmarkIdx, LandmarkIdx) {
        use LandmarkIdx::*;
        match self {
            Side::Left => (LeftShoulder, LeftElbow, LeftWrist),
            Side::Right => (RightShoulder, RightElbow, RightWrist),
        }
    }

    /// The elbow landmark, the vertex the arm angle is measured at.
    pub fn elbow(self) -> LandmarkIdx {
        self.arm().1
    }
}

/// Extracts the (shoulder, elbow, wrist) positions of one arm.
pub fn arm_triple(landmarks: &Landmarks, side: Side) -> (Point, Point, Point) {
    let (shoulder, elbow, wrist) = side.arm();
    (
        landmarks.position(shoulder),
        landmarks.position(elbow),
        landmarks.position(wrist),
    )
}
