//! Simulated progress for the analysis phase.
//!
//! The inference call is a single opaque await with no progress signal, so the
//! bar is advanced on a timer and capped below completion until the call
//! resolves. Pages label it as simulated.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::trace;
use uuid::Uuid;

use crate::session::SessionStore;

/// Progress shown as soon as a file is accepted.
pub const UPLOADING_PROGRESS: u8 = 10;
/// Progress when the encode step begins.
pub const ANALYZING_PROGRESS: u8 = 30;
pub const TICK_STEP: u8 = 10;
/// The simulated bar never passes this before the call resolves.
pub const TICK_CEILING: u8 = 90;
pub const COMPLETE: u8 = 100;

/// Next simulated value. Never lower than `current`.
pub fn advance(current: u8) -> u8 {
    current
        .saturating_add(TICK_STEP)
        .min(TICK_CEILING)
        .max(current)
}

/// Background task bumping a session's progress every `period`.
/// Aborted by `stop` or when dropped.
pub struct ProgressTicker {
    handle: JoinHandle<()>,
}

impl ProgressTicker {
    pub fn start(sessions: SessionStore, session_id: Uuid, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                match sessions.tick_progress(session_id).await {
                    Some(progress) => trace!("Session {session_id} progress {progress}%"),
                    None => break,
                }
            }
        });
        Self { handle }
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
