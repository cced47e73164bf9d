//! Stage/count state machine over per-frame joint angles.

use std::fmt;

use fitfuel_core::{geometry, FramePose, Landmark, PoseLandmark};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{CounterConfig, RuleSet};

/// Counter phase label gating the next transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Up,
    Down,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Up => write!(f, "Up"),
            Stage::Down => write!(f, "Down"),
        }
    }
}

/// Counter state for one session: a monotone rep count plus the current stage.
///
/// A plain value object; [`RepCounter::update`] consumes one and returns the
/// next, so the host decides where the state lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CounterState {
    pub count: u32,
    pub stage: Option<Stage>,
}

impl CounterState {
    /// Fresh session state: zero reps, stage unset
    pub fn new() -> Self {
        Self::default()
    }
}

/// The four joint angles derived from one valid frame, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointAngles {
    /// Left hip / left knee / left ankle
    pub knee_left: f64,
    /// Right hip / right knee / right ankle
    pub knee_right: f64,
    /// Left shoulder / left hip / left knee
    pub hip_left: f64,
    /// Right shoulder / right hip / right knee
    pub hip_right: f64,
}

impl JointAngles {
    /// Derive the four angles, or `None` if any required landmark is missing
    /// or carries a non-finite coordinate.
    pub fn from_pose(pose: &FramePose) -> Option<Self> {
        let shoulder_l = required(pose, PoseLandmark::LeftShoulder)?;
        let shoulder_r = required(pose, PoseLandmark::RightShoulder)?;
        let hip_l = required(pose, PoseLandmark::LeftHip)?;
        let hip_r = required(pose, PoseLandmark::RightHip)?;
        let knee_l = required(pose, PoseLandmark::LeftKnee)?;
        let knee_r = required(pose, PoseLandmark::RightKnee)?;
        let ankle_l = required(pose, PoseLandmark::LeftAnkle)?;
        let ankle_r = required(pose, PoseLandmark::RightAnkle)?;

        Some(Self {
            knee_left: geometry::joint_angle(&hip_l, &knee_l, &ankle_l),
            knee_right: geometry::joint_angle(&hip_r, &knee_r, &ankle_r),
            hip_left: geometry::joint_angle(&shoulder_l, &hip_l, &knee_l),
            hip_right: geometry::joint_angle(&shoulder_r, &hip_r, &knee_r),
        })
    }
}

fn required(pose: &FramePose, which: PoseLandmark) -> Option<Landmark> {
    let Some(lm) = pose.landmark(which) else {
        debug!(landmark = ?which, "skipping frame: required landmark missing");
        return None;
    };
    if !lm.is_finite() {
        warn!(landmark = ?which, "skipping frame: non-finite coordinate");
        return None;
    }
    Some(lm)
}

/// Per-frame result reported to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameUpdate {
    pub count: u32,
    pub stage: Option<Stage>,
    pub angles: JointAngles,
}

/// Squat repetition counter.
///
/// Holds only configuration; the session state is passed through
/// [`RepCounter::update`] explicitly, which keeps every transition
/// deterministic and unit-testable without a host.
#[derive(Debug, Clone, Default)]
pub struct RepCounter {
    config: CounterConfig,
}

impl RepCounter {
    pub fn new(config: CounterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    /// Process one frame.
    ///
    /// A frame without a complete, finite set of required landmarks leaves
    /// the state untouched and produces no update. Otherwise at most one
    /// stage transition fires and the updated `(count, stage, angles)` is
    /// reported for display.
    pub fn update(
        &self,
        state: CounterState,
        pose: &FramePose,
    ) -> (CounterState, Option<FrameUpdate>) {
        let Some(angles) = JointAngles::from_pose(pose) else {
            return (state, None);
        };

        let next = self.transition(state, &angles);
        let update = FrameUpdate {
            count: next.count,
            stage: next.stage,
            angles,
        };
        (next, Some(update))
    }

    // The duplicated guard under `Overlapping` is part of the contract: the
    // counting branch is shadowed and must stay in second position.
    #[allow(clippy::ifs_same_cond)]
    fn transition(&self, state: CounterState, angles: &JointAngles) -> CounterState {
        let straight = self.config.straight;
        let bottom = self.config.bottom;

        let knees_straight =
            straight.contains(angles.knee_left) && straight.contains(angles.knee_right);
        let hips_straight =
            straight.contains(angles.hip_left) && straight.contains(angles.hip_right);
        let hips_bent = bottom.contains(angles.hip_left) && bottom.contains(angles.hip_right);

        let mut next = state;
        match self.config.rules {
            RuleSet::Overlapping => {
                if knees_straight && hips_straight {
                    next.stage = Some(Stage::Up);
                } else if knees_straight && hips_straight {
                    next.stage = Some(Stage::Down);
                    next.count += 1;
                } else if state.stage == Some(Stage::Down) && hips_bent && knees_straight {
                    next.stage = Some(Stage::Up);
                }
            }
            RuleSet::Disjoint => {
                if knees_straight && hips_straight {
                    if state.stage == Some(Stage::Down) {
                        next.count += 1;
                    }
                    next.stage = Some(Stage::Up);
                } else if knees_straight && hips_bent {
                    next.stage = Some(Stage::Down);
                }
            }
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitfuel_core::Timestamp;

    fn set(pose: &mut FramePose, which: PoseLandmark, x: f32, y: f32) {
        pose.landmarks[which as usize] = Some(Landmark::at(x, y));
    }

    /// Vertical body line on both sides: all four angles read 180.
    fn standing_pose() -> FramePose {
        let mut pose = FramePose::empty(Timestamp::from_nanos(0));
        for (x, shoulder, hip, knee, ankle) in [
            (
                0.45,
                PoseLandmark::LeftShoulder,
                PoseLandmark::LeftHip,
                PoseLandmark::LeftKnee,
                PoseLandmark::LeftAnkle,
            ),
            (
                0.55,
                PoseLandmark::RightShoulder,
                PoseLandmark::RightHip,
                PoseLandmark::RightKnee,
                PoseLandmark::RightAnkle,
            ),
        ] {
            set(&mut pose, shoulder, x, 0.20);
            set(&mut pose, hip, x, 0.45);
            set(&mut pose, knee, x, 0.70);
            set(&mut pose, ankle, x, 0.95);
        }
        pose
    }

    /// Torso horizontal over vertical legs: hips read 90, knees read 180.
    fn folded_pose() -> FramePose {
        let mut pose = standing_pose();
        set(&mut pose, PoseLandmark::LeftShoulder, 0.15, 0.45);
        set(&mut pose, PoseLandmark::RightShoulder, 0.85, 0.45);
        pose
    }

    /// Shins horizontal: knees read 90, hips stay straight. Matches no guard.
    fn knees_bent_pose() -> FramePose {
        let mut pose = standing_pose();
        set(&mut pose, PoseLandmark::LeftAnkle, 0.20, 0.70);
        set(&mut pose, PoseLandmark::RightAnkle, 0.80, 0.70);
        pose
    }

    fn counter(rules: RuleSet) -> RepCounter {
        RepCounter::new(CounterConfig {
            rules,
            ..CounterConfig::default()
        })
    }

    #[test]
    fn test_standing_frame_sets_stage_up() {
        let counter = counter(RuleSet::Overlapping);
        let (state, update) = counter.update(CounterState::new(), &standing_pose());

        assert_eq!(state.stage, Some(Stage::Up));
        assert_eq!(state.count, 0);

        let update = update.expect("valid frame must report an update");
        assert!((update.angles.knee_left - 180.0).abs() < 1e-6);
        assert!((update.angles.hip_right - 180.0).abs() < 1e-6);
    }

    #[test]
    fn test_overlapping_counting_branch_is_shadowed() {
        let counter = counter(RuleSet::Overlapping);
        let mut state = CounterState::new();

        // A full movement cycle, repeated: the straight-pose guard always
        // wins before the counting branch, so the count never advances and
        // the stage never organically reaches Down.
        for _ in 0..5 {
            for pose in [standing_pose(), folded_pose(), standing_pose()] {
                let (next, _) = counter.update(state, &pose);
                assert_ne!(next.stage, Some(Stage::Down));
                state = next;
            }
        }
        assert_eq!(state.count, 0);
    }

    #[test]
    fn test_overlapping_bent_hips_recover_from_down() {
        let counter = counter(RuleSet::Overlapping);
        let seeded = CounterState {
            count: 3,
            stage: Some(Stage::Down),
        };

        let (state, update) = counter.update(seeded, &folded_pose());
        assert_eq!(state.stage, Some(Stage::Up));
        assert_eq!(state.count, 3);

        let angles = update.unwrap().angles;
        assert!((angles.hip_left - 90.0).abs() < 1e-6);
        assert!((angles.knee_left - 180.0).abs() < 1e-6);
    }

    #[test]
    fn test_missing_required_landmark_is_a_no_op() {
        let counter = counter(RuleSet::Overlapping);
        let seeded = CounterState {
            count: 2,
            stage: Some(Stage::Up),
        };

        let mut pose = standing_pose();
        pose.landmarks[PoseLandmark::LeftAnkle as usize] = None;

        let (state, update) = counter.update(seeded, &pose);
        assert_eq!(state, seeded);
        assert!(update.is_none());
    }

    #[test]
    fn test_empty_frame_is_a_no_op() {
        let counter = counter(RuleSet::Disjoint);
        let pose = FramePose::empty(Timestamp::from_nanos(0));

        let (state, update) = counter.update(CounterState::new(), &pose);
        assert_eq!(state, CounterState::new());
        assert!(update.is_none());
    }

    #[test]
    fn test_non_finite_coordinate_is_a_no_op() {
        let counter = counter(RuleSet::Disjoint);
        let seeded = CounterState {
            count: 1,
            stage: Some(Stage::Up),
        };

        let mut pose = standing_pose();
        pose.landmarks[PoseLandmark::LeftHip as usize] = Some(Landmark::at(f32::NAN, 0.45));

        let (state, update) = counter.update(seeded, &pose);
        assert_eq!(state, seeded);
        assert!(update.is_none());
    }

    #[test]
    fn test_disjoint_counts_completed_cycles() {
        let counter = counter(RuleSet::Disjoint);
        let mut state = CounterState::new();

        let (next, _) = counter.update(state, &standing_pose());
        assert_eq!(next.stage, Some(Stage::Up));
        assert_eq!(next.count, 0);
        state = next;

        let (next, _) = counter.update(state, &folded_pose());
        assert_eq!(next.stage, Some(Stage::Down));
        assert_eq!(next.count, 0);
        state = next;

        let (next, _) = counter.update(state, &standing_pose());
        assert_eq!(next.stage, Some(Stage::Up));
        assert_eq!(next.count, 1);
        state = next;

        // Second cycle.
        let (next, _) = counter.update(state, &folded_pose());
        let (next, _) = counter.update(next, &standing_pose());
        assert_eq!(next.count, 2);
    }

    #[test]
    fn test_disjoint_incomplete_descent_does_not_count() {
        let counter = counter(RuleSet::Disjoint);
        let mut state = CounterState::new();

        for pose in [standing_pose(), knees_bent_pose(), standing_pose()] {
            let (next, _) = counter.update(state, &pose);
            state = next;
        }
        assert_eq!(state.count, 0);
        assert_eq!(state.stage, Some(Stage::Up));
    }

    #[test]
    fn test_count_is_monotone_under_both_rule_sets() {
        for rules in [RuleSet::Overlapping, RuleSet::Disjoint] {
            let counter = counter(rules);
            let mut state = CounterState::new();

            let sequence = [
                standing_pose(),
                knees_bent_pose(),
                folded_pose(),
                FramePose::empty(Timestamp::from_nanos(0)),
                standing_pose(),
                folded_pose(),
                standing_pose(),
            ];

            for pose in &sequence {
                let (next, _) = counter.update(state, pose);
                assert!(next.count >= state.count, "count regressed under {rules:?}");
                state = next;
            }
        }
    }

    #[test]
    fn test_no_guard_match_leaves_state_unchanged() {
        let counter = counter(RuleSet::Overlapping);
        let seeded = CounterState {
            count: 4,
            stage: Some(Stage::Up),
        };

        let (state, update) = counter.update(seeded, &knees_bent_pose());
        assert_eq!(state, seeded);
        // The frame was valid, so angles are still reported.
        assert!(update.is_some());
    }

    #[test]
    fn test_update_serializes_for_display_consumers() {
        let counter = counter(RuleSet::Overlapping);
        let (_, update) = counter.update(CounterState::new(), &standing_pose());

        let value = serde_json::to_value(update.unwrap()).unwrap();
        assert_eq!(value["count"], 0);
        assert_eq!(value["stage"], "Up");
        assert!(value["angles"]["knee_left"].is_number());
    }
}
