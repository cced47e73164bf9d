//! Presentation strings for the per-frame display payload.

use crate::counter::{FrameUpdate, Stage};

/// Formatted text lines for the host UI, one per widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusText {
    pub reps: String,
    pub stage: String,
    pub hip_left: String,
    pub knee_left: String,
    pub hip_right: String,
    pub knee_right: String,
}

impl StatusText {
    pub fn from_update(update: &FrameUpdate) -> Self {
        Self {
            reps: format!("Reps: {}", update.count),
            stage: format!("Stage: {}", stage_label(update.stage)),
            hip_left: format!("Hip L: {:.1}°", update.angles.hip_left),
            knee_left: format!("Knee L: {:.1}°", update.angles.knee_left),
            hip_right: format!("Hip R: {:.1}°", update.angles.hip_right),
            knee_right: format!("Knee R: {:.1}°", update.angles.knee_right),
        }
    }
}

fn stage_label(stage: Option<Stage>) -> String {
    match stage {
        Some(stage) => stage.to_string(),
        None => "-".to_string(),
    }
}
