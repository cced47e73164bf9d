//! Skeletal overlay projection.
//!
//! Turns a [`FramePose`] into ready-to-draw viewport geometry: one line
//! segment per skeletal connection with both endpoints present, one dot per
//! present landmark. Pure geometry; the host owns the actual drawing surface.

use serde::{Deserialize, Serialize};

use crate::types::{FramePose, PoseLandmark};

/// A point in viewport pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f32,
    pub y: f32,
}

/// Line segment between two projected landmarks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: PixelPoint,
    pub end: PixelPoint,
}

/// Skeletal overlay for one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverlayGeometry {
    pub segments: Vec<Segment>,
    pub points: Vec<PixelPoint>,
}

impl OverlayGeometry {
    /// Project a pose onto a `width` x `height` viewport.
    pub fn project(pose: &FramePose, width: f32, height: f32) -> Self {
        let mut segments = Vec::new();
        for (from, to) in PoseLandmark::connections() {
            if let (Some(start), Some(end)) = (pose.landmark(*from), pose.landmark(*to)) {
                segments.push(Segment {
                    start: PixelPoint {
                        x: start.x * width,
                        y: start.y * height,
                    },
                    end: PixelPoint {
                        x: end.x * width,
                        y: end.y * height,
                    },
                });
            }
        }

        let points = pose
            .landmarks
            .iter()
            .flatten()
            .map(|lm| PixelPoint {
                x: lm.x * width,
                y: lm.y * height,
            })
            .collect();

        Self { segments, points }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.points.is_empty()
    }
}
