//! Session wrapper owning the counter state across a frame stream.

use fitfuel_core::{FramePose, SessionId, Timestamp};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::config::CounterConfig;
use crate::counter::{CounterState, FrameUpdate, RepCounter, Stage};

/// Latest committed counters, read as one unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    pub count: u32,
    pub stage: Option<Stage>,
    pub frames_processed: u64,
    pub frames_skipped: u64,
}

#[derive(Debug, Clone, Copy, Default)]
struct SessionInner {
    state: CounterState,
    frames_processed: u64,
    frames_skipped: u64,
}

/// One counting session: a rep counter plus the state it owns.
///
/// Frames arrive sequentially from the capture pipeline and each update
/// commits under an exclusive lock, so a display reader calling
/// [`CounterSession::snapshot`] always observes a consistent
/// `(count, stage)` pair, never a torn one.
pub struct CounterSession {
    id: SessionId,
    started_at: Timestamp,
    counter: RepCounter,
    inner: RwLock<SessionInner>,
}

impl CounterSession {
    pub fn new(config: CounterConfig) -> Self {
        Self {
            id: SessionId::new(),
            started_at: Timestamp::now(),
            counter: RepCounter::new(config),
            inner: RwLock::new(SessionInner::default()),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    /// Feed one frame; returns the display update, or `None` if the frame
    /// was skipped.
    pub fn process_frame(&self, pose: &FramePose) -> Option<FrameUpdate> {
        let mut inner = self.inner.write();
        let (next, update) = self.counter.update(inner.state, pose);
        inner.state = next;
        match update {
            Some(_) => inner.frames_processed += 1,
            None => inner.frames_skipped += 1,
        }
        update
    }

    /// Latest committed state
    pub fn snapshot(&self) -> CounterSnapshot {
        let inner = self.inner.read();
        CounterSnapshot {
            count: inner.state.count,
            stage: inner.state.stage,
            frames_processed: inner.frames_processed,
            frames_skipped: inner.frames_skipped,
        }
    }

    /// Start the session over: zero reps, stage unset
    pub fn reset(&self) {
        *self.inner.write() = SessionInner::default();
    }
}

impl Default for CounterSession {
    fn default() -> Self {
        Self::new(CounterConfig::default())
    }
}
