//! Fundamental types for the fitfuel system.

use chrono::{DateTime, Utc};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Unique identifier for one counting session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Timestamp wrapper with nanosecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp_nanos_opt().unwrap_or(0))
    }

    pub fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    pub fn as_nanos(&self) -> i64 {
        self.0
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1_000_000_000.0
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.0)
    }
}

/// A single detected body landmark in normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Normalized x in [0, 1], left edge of the frame at 0
    pub x: f32,
    /// Normalized y in [0, 1], top edge of the frame at 0
    pub y: f32,
    /// Relative depth, origin at the subject's hip midpoint
    pub z: f32,
    /// Detection confidence in [0, 1]
    pub visibility: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self { x, y, z, visibility }
    }

    /// Landmark at a 2D position with full visibility
    pub fn at(x: f32, y: f32) -> Self {
        Self::new(x, y, 0.0, 1.0)
    }

    pub fn to_point2(&self) -> Point2<f64> {
        Point2::new(self.x as f64, self.y as f64)
    }

    /// Both planar coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// 33-landmark full-body taxonomy emitted by the upstream pose detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PoseLandmark {
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

impl PoseLandmark {
    pub const COUNT: usize = 33;

    pub fn from_index(idx: u8) -> Option<Self> {
        match idx {
            0 => Some(Self::Nose),
            1 => Some(Self::LeftEyeInner),
            2 => Some(Self::LeftEye),
            3 => Some(Self::LeftEyeOuter),
            4 => Some(Self::RightEyeInner),
            5 => Some(Self::RightEye),
            6 => Some(Self::RightEyeOuter),
            7 => Some(Self::LeftEar),
            8 => Some(Self::RightEar),
            9 => Some(Self::MouthLeft),
            10 => Some(Self::MouthRight),
            11 => Some(Self::LeftShoulder),
            12 => Some(Self::RightShoulder),
            13 => Some(Self::LeftElbow),
            14 => Some(Self::RightElbow),
            15 => Some(Self::LeftWrist),
            16 => Some(Self::RightWrist),
            17 => Some(Self::LeftPinky),
            18 => Some(Self::RightPinky),
            19 => Some(Self::LeftIndex),
            20 => Some(Self::RightIndex),
            21 => Some(Self::LeftThumb),
            22 => Some(Self::RightThumb),
            23 => Some(Self::LeftHip),
            24 => Some(Self::RightHip),
            25 => Some(Self::LeftKnee),
            26 => Some(Self::RightKnee),
            27 => Some(Self::LeftAnkle),
            28 => Some(Self::RightAnkle),
            29 => Some(Self::LeftHeel),
            30 => Some(Self::RightHeel),
            31 => Some(Self::LeftFootIndex),
            32 => Some(Self::RightFootIndex),
            _ => None,
        }
    }

    /// Returns skeletal connection pairs for overlay rendering
    pub fn connections() -> &'static [(PoseLandmark, PoseLandmark)] {
        &[
            // Face
            (PoseLandmark::Nose, PoseLandmark::LeftEyeInner),
            (PoseLandmark::LeftEyeInner, PoseLandmark::LeftEye),
            (PoseLandmark::LeftEye, PoseLandmark::LeftEyeOuter),
            (PoseLandmark::LeftEyeOuter, PoseLandmark::LeftEar),
            (PoseLandmark::Nose, PoseLandmark::RightEyeInner),
            (PoseLandmark::RightEyeInner, PoseLandmark::RightEye),
            (PoseLandmark::RightEye, PoseLandmark::RightEyeOuter),
            (PoseLandmark::RightEyeOuter, PoseLandmark::RightEar),
            (PoseLandmark::MouthLeft, PoseLandmark::MouthRight),
            // Arms
            (PoseLandmark::LeftShoulder, PoseLandmark::RightShoulder),
            (PoseLandmark::LeftShoulder, PoseLandmark::LeftElbow),
            (PoseLandmark::LeftElbow, PoseLandmark::LeftWrist),
            (PoseLandmark::LeftWrist, PoseLandmark::LeftPinky),
            (PoseLandmark::LeftWrist, PoseLandmark::LeftIndex),
            (PoseLandmark::LeftWrist, PoseLandmark::LeftThumb),
            (PoseLandmark::LeftPinky, PoseLandmark::LeftIndex),
            (PoseLandmark::RightShoulder, PoseLandmark::RightElbow),
            (PoseLandmark::RightElbow, PoseLandmark::RightWrist),
            (PoseLandmark::RightWrist, PoseLandmark::RightPinky),
            (PoseLandmark::RightWrist, PoseLandmark::RightIndex),
            (PoseLandmark::RightWrist, PoseLandmark::RightThumb),
            (PoseLandmark::RightPinky, PoseLandmark::RightIndex),
            // Torso
            (PoseLandmark::LeftShoulder, PoseLandmark::LeftHip),
            (PoseLandmark::RightShoulder, PoseLandmark::RightHip),
            (PoseLandmark::LeftHip, PoseLandmark::RightHip),
            // Legs
            (PoseLandmark::LeftHip, PoseLandmark::LeftKnee),
            (PoseLandmark::RightHip, PoseLandmark::RightKnee),
            (PoseLandmark::LeftKnee, PoseLandmark::LeftAnkle),
            (PoseLandmark::RightKnee, PoseLandmark::RightAnkle),
            (PoseLandmark::LeftAnkle, PoseLandmark::LeftHeel),
            (PoseLandmark::RightAnkle, PoseLandmark::RightHeel),
            (PoseLandmark::LeftHeel, PoseLandmark::LeftFootIndex),
            (PoseLandmark::RightHeel, PoseLandmark::RightFootIndex),
            (PoseLandmark::LeftAnkle, PoseLandmark::LeftFootIndex),
            (PoseLandmark::RightAnkle, PoseLandmark::RightFootIndex),
        ]
    }
}

/// One detected person's landmarks for one video frame; may be incomplete
//
// NOTE: `Serialize` cannot be derived here — serde only implements
// `Serialize`/`Deserialize` for arrays up to length 32, and `landmarks` is a
// 33-element array. The derive was present but never exercised (nothing in the
// crate serializes a `FramePose`), so it is dropped to let the crate build.
#[derive(Debug, Clone)]
pub struct FramePose {
    pub timestamp: Timestamp,
    pub landmarks: [Option<Landmark>; PoseLandmark::COUNT],
}

impl FramePose {
    /// Values per landmark in the flat detector buffer: x, y, z, visibility
    pub const FLAT_STRIDE: usize = 4;

    /// Frame with no landmarks detected
    pub fn empty(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            landmarks: [None; PoseLandmark::COUNT],
        }
    }

    /// Build a frame from the flat `[x, y, z, visibility] * 33` buffer the
    /// upstream detector emits.
    pub fn from_flat(timestamp: Timestamp, data: &[f32]) -> Result<Self> {
        let expected = PoseLandmark::COUNT * Self::FLAT_STRIDE;
        if data.len() != expected {
            return Err(Error::LandmarkCount {
                expected,
                actual: data.len(),
            });
        }

        let mut landmarks = [None; PoseLandmark::COUNT];
        for (i, chunk) in data.chunks_exact(Self::FLAT_STRIDE).enumerate() {
            landmarks[i] = Some(Landmark::new(chunk[0], chunk[1], chunk[2], chunk[3]));
        }

        Ok(Self {
            timestamp,
            landmarks,
        })
    }

    pub fn landmark(&self, which: PoseLandmark) -> Option<Landmark> {
        self.landmarks[which as usize]
    }

    /// Number of landmarks present in this frame
    pub fn present_count(&self) -> usize {
        self.landmarks.iter().flatten().count()
    }
}
