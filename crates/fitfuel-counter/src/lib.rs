//! # Fitfuel-Counter
//!
//! Squat repetition counting over a stream of pose-landmark frames.
//!
//! Each valid frame yields four joint angles (left/right knee, left/right
//! hip). A small stage state machine walks the angles: standing tall is
//! "Up", the bottom of the movement is "Down", and a completed cycle bumps
//! the repetition count. Frames missing a required landmark, or carrying a
//! non-finite coordinate on one, are skipped without touching the state.
//!
//! ## Rule sets
//!
//! Two transition rule sets are available ([`RuleSet`]):
//!
//! - [`RuleSet::Overlapping`] (default) evaluates guards in a fixed priority
//!   order in which the straight-pose guard appears twice. The second,
//!   counting occurrence is shadowed by the first, so the count never
//!   advances. Kept selectable because the priority order itself is part of
//!   the counter's observable contract.
//! - [`RuleSet::Disjoint`] reaches "Up" and "Down" through disjoint angle
//!   conditions and counts one repetition per completed Down-to-Up cycle.

pub mod config;
pub mod counter;
pub mod display;
pub mod session;

pub use config::*;
pub use counter::*;
pub use display::*;
pub use session::*;
