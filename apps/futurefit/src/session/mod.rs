//! Per-browser UI state: the upload flags, simulated progress, last error and
//! the analysis result, held in memory until reset or expiry.

pub mod handlers;
pub mod orchestrator;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::analysis::schema::AnalysisResult;
use crate::progress;

/// Observable phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Uploading,
    Analyzing,
    Results,
}

/// Transient upload flags, as exposed to the progress endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadState {
    pub is_uploading: bool,
    pub is_analyzing: bool,
    pub progress: u8,
    pub error: Option<String>,
}

impl UploadState {
    pub fn is_busy(&self) -> bool {
        self.is_uploading || self.is_analyzing
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub upload: UploadState,
    pub results: Option<AnalysisResult>,
    touched_at: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            upload: UploadState::default(),
            results: None,
            touched_at: Instant::now(),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.upload.is_uploading {
            Phase::Uploading
        } else if self.upload.is_analyzing {
            Phase::Analyzing
        } else if self.results.is_some() {
            Phase::Results
        } else {
            Phase::Idle
        }
    }
}

/// In-memory session map shared by handlers, the orchestrator and tickers.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    /// Creates an idle session, first purging sessions idle longer than `ttl`.
    /// Busy sessions are never purged.
    pub async fn create(&self, ttl: Duration) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.upload.is_busy() || s.touched_at.elapsed() < ttl);
        let purged = before - sessions.len();
        if purged > 0 {
            debug!("Purged {purged} expired sessions");
        }
        sessions.insert(id, Session::new());
        id
    }

    /// Snapshot of a session. Marks it as recently used.
    pub async fn get(&self, id: Uuid) -> Option<Session> {
        let mut sessions = self.inner.write().await;
        let session = sessions.get_mut(&id)?;
        session.touched_at = Instant::now();
        Some(session.clone())
    }

    /// Applies `f` to a session under the write lock. `None` if the session is gone.
    pub async fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let mut sessions = self.inner.write().await;
        let session = sessions.get_mut(&id)?;
        session.touched_at = Instant::now();
        Some(f(session))
    }

    /// Advances simulated progress while the session is analyzing.
    /// Returns the new value, or `None` once there is nothing left to advance.
    pub async fn tick_progress(&self, id: Uuid) -> Option<u8> {
        let mut sessions = self.inner.write().await;
        let session = sessions.get_mut(&id)?;
        if !session.upload.is_analyzing {
            return None;
        }
        session.upload.progress = progress::advance(session.upload.progress);
        Some(session.upload.progress)
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
