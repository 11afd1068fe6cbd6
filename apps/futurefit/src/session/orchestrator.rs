//! Orchestrator — drives a session through
//! `Idle → Uploading → Analyzing → {Results | Idle + error} → (reset) → Idle`.
//!
//! At most one analysis runs per session: uploads and resets are refused while
//! the session is busy. Locks are never held across the inference call.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::analysis::analyzer::{ResumeAnalyzer, GENERIC_FAILURE_MESSAGE};
use crate::config::Config;
use crate::errors::AppError;
use crate::intake::ResumeUpload;
use crate::progress::{self, ProgressTicker};
use crate::session::{Session, SessionStore, UploadState};

#[derive(Clone)]
pub struct Orchestrator {
    sessions: SessionStore,
    analyzer: Arc<dyn ResumeAnalyzer>,
    progress_tick: Duration,
    progress_hold: Duration,
    session_ttl: Duration,
}

impl Orchestrator {
    pub fn new(analyzer: Arc<dyn ResumeAnalyzer>, config: &Config) -> Self {
        Self {
            sessions: SessionStore::default(),
            analyzer,
            progress_tick: config.progress_tick,
            progress_hold: config.progress_hold,
            session_ttl: config.session_ttl,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub async fn new_session(&self) -> Uuid {
        self.sessions.create(self.session_ttl).await
    }

    pub async fn session(&self, id: Uuid) -> Result<Session, AppError> {
        self.sessions
            .get(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    /// Fails unless the session exists and shows the intake widget.
    pub async fn ensure_accepting(&self, id: Uuid) -> Result<(), AppError> {
        let session = self.session(id).await?;
        if session.upload.is_busy() {
            return Err(AppError::Conflict(
                "An analysis is already in progress".to_string(),
            ));
        }
        if session.results.is_some() {
            return Err(AppError::Conflict(
                "Reset the current results before uploading another resume".to_string(),
            ));
        }
        Ok(())
    }

    /// Accepts an upload and starts the analysis in the background.
    ///
    /// The session is `Uploading` when this returns. The handle resolves once
    /// the session has reached `Results` or returned to `Idle` with an error.
    pub async fn start(&self, id: Uuid, upload: ResumeUpload) -> Result<JoinHandle<()>, AppError> {
        self.sessions
            .update(id, |session| {
                if session.upload.is_busy() {
                    return Err(AppError::Conflict(
                        "An analysis is already in progress".to_string(),
                    ));
                }
                if session.results.is_some() {
                    return Err(AppError::Conflict(
                        "Reset the current results before uploading another resume".to_string(),
                    ));
                }
                session.upload = UploadState {
                    is_uploading: true,
                    is_analyzing: false,
                    progress: progress::UPLOADING_PROGRESS,
                    error: None,
                };
                Ok(())
            })
            .await
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))??;

        info!("Session {id}: accepted {}", upload.file_name);
        let this = self.clone();
        Ok(tokio::spawn(async move { this.run(id, upload).await }))
    }

    async fn run(self, id: Uuid, upload: ResumeUpload) {
        let still_open = self
            .sessions
            .update(id, |session| {
                session.upload.is_uploading = false;
                session.upload.is_analyzing = true;
                session.upload.progress = progress::ANALYZING_PROGRESS;
            })
            .await;
        if still_open.is_none() {
            warn!("Session {id} vanished before analysis started");
            return;
        }

        let ticker = ProgressTicker::start(self.sessions.clone(), id, self.progress_tick);

        // Run in its own task so a panic in the analyzer lands here as a JoinError.
        let analyzer = Arc::clone(&self.analyzer);
        let outcome = tokio::spawn(async move { analyzer.analyze(&upload).await }).await;

        ticker.stop();

        match outcome {
            Ok(Ok(result)) => {
                let open = self
                    .sessions
                    .update(id, |session| session.upload.progress = progress::COMPLETE)
                    .await;
                if open.is_none() {
                    warn!("Session {id} closed during analysis; discarding result");
                    return;
                }
                tokio::time::sleep(self.progress_hold).await;
                self.sessions
                    .update(id, |session| {
                        session.results = Some(result);
                        session.upload = UploadState::default();
                    })
                    .await;
                info!("Session {id}: analysis complete");
            }
            Ok(Err(e)) => {
                error!("Session {id}: analysis failed ({}): {e}", e.kind());
                self.fail(id).await;
            }
            Err(join_error) => {
                error!("Session {id}: analysis task aborted: {join_error}");
                self.fail(id).await;
            }
        }
    }

    async fn fail(&self, id: Uuid) {
        self.sessions
            .update(id, |session| {
                session.upload = UploadState {
                    error: Some(GENERIC_FAILURE_MESSAGE.to_string()),
                    ..UploadState::default()
                };
            })
            .await;
    }

    /// Clears results and errors, returning the session to `Idle`.
    pub async fn reset(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .update(id, |session| {
                if session.upload.is_busy() {
                    return Err(AppError::Conflict(
                        "Cannot reset while an analysis is in progress".to_string(),
                    ));
                }
                session.results = None;
                session.upload = UploadState::default();
                Ok(())
            })
            .await
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use async_trait::async_trait;
    use bytes::Bytes;

    use crate::analysis::analyzer::{parse_model_output, AnalysisError};
    use crate::analysis::schema::AnalysisResult;
    use crate::session::Phase;

    pub(crate) const SCENARIO_JSON: &str = r#"{"aiReplacementTimeline":{"yearsUntilReplacement":10,"riskLevel":"Medium","reasoning":"...","keyVulnerabilities":["a","b"]},"recommendedCertifications":[],"degreePrograms":[],"aiTools":[],"overallRecommendation":"..."}"#;

    /// Replies with fixed model text after `delay`, through the real parsing path.
    pub(crate) struct CannedAnalyzer {
        pub text: String,
        pub delay: Duration,
    }

    #[async_trait]
    impl ResumeAnalyzer for CannedAnalyzer {
        async fn analyze(&self, _upload: &ResumeUpload) -> Result<AnalysisResult, AnalysisError> {
            tokio::time::sleep(self.delay).await;
            parse_model_output(&self.text)
        }
    }

    struct PanickingAnalyzer;

    #[async_trait]
    impl ResumeAnalyzer for PanickingAnalyzer {
        async fn analyze(&self, _upload: &ResumeUpload) -> Result<AnalysisResult, AnalysisError> {
            panic!("analyzer bug");
        }
    }

    pub(crate) fn pdf_upload() -> ResumeUpload {
        ResumeUpload {
            file_name: "cv.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            bytes: Bytes::from_static(b"%PDF-1.4\n"),
        }
    }

    fn orchestrator(text: &str, delay: Duration) -> Orchestrator {
        Orchestrator::new(
            Arc::new(CannedAnalyzer {
                text: text.to_string(),
                delay,
            }),
            &Config::for_tests(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_analysis_reaches_results() {
        let orch = orchestrator(SCENARIO_JSON, Duration::from_secs(3));
        let id = orch.new_session().await;

        let handle = orch.start(id, pdf_upload()).await.unwrap();
        assert_eq!(orch.session(id).await.unwrap().phase(), Phase::Uploading);
        handle.await.unwrap();

        let session = orch.session(id).await.unwrap();
        assert_eq!(session.phase(), Phase::Results);
        assert_eq!(session.upload, UploadState::default());
        let result = session.results.unwrap();
        assert_eq!(result.ai_replacement_timeline.years_until_replacement, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_is_monotonic_and_hits_100_before_results() {
        let orch = orchestrator(SCENARIO_JSON, Duration::from_millis(2500));
        let id = orch.new_session().await;
        let handle = orch.start(id, pdf_upload()).await.unwrap();

        let mut last = 0u8;
        let mut saw_complete_while_analyzing = false;
        loop {
            let session = orch.session(id).await.unwrap();
            match session.phase() {
                Phase::Results => break,
                Phase::Analyzing | Phase::Uploading => {
                    assert!(session.upload.progress >= last, "progress went backwards");
                    last = session.upload.progress;
                    if last == progress::COMPLETE {
                        saw_complete_while_analyzing = true;
                    } else {
                        assert!(last <= progress::TICK_CEILING);
                    }
                }
                Phase::Idle => panic!("analysis unexpectedly failed"),
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        handle.await.unwrap();
        assert!(saw_complete_while_analyzing);
        assert_eq!(last, progress::COMPLETE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_response_without_json_returns_to_idle_with_error() {
        let orch = orchestrator("I am unable to read PDFs today.", Duration::from_millis(10));
        let id = orch.new_session().await;
        orch.start(id, pdf_upload()).await.unwrap().await.unwrap();

        let session = orch.session(id).await.unwrap();
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.results.is_none());
        assert_eq!(session.upload.error.as_deref(), Some(GENERIC_FAILURE_MESSAGE));
        assert_eq!(session.upload.progress, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_analyzer_panic_is_contained() {
        let orch = Orchestrator::new(Arc::new(PanickingAnalyzer), &Config::for_tests());
        let id = orch.new_session().await;
        orch.start(id, pdf_upload()).await.unwrap().await.unwrap();

        let session = orch.session(id).await.unwrap();
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.upload.error.as_deref(), Some(GENERIC_FAILURE_MESSAGE));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_upload_while_busy_is_conflict() {
        let orch = orchestrator(SCENARIO_JSON, Duration::from_secs(5));
        let id = orch.new_session().await;
        let handle = orch.start(id, pdf_upload()).await.unwrap();

        let err = orch.start(id, pdf_upload()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(matches!(
            orch.reset(id).await.unwrap_err(),
            AppError::Conflict(_)
        ));
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_after_results_returns_to_idle() {
        let orch = orchestrator(SCENARIO_JSON, Duration::from_millis(10));
        let id = orch.new_session().await;
        orch.start(id, pdf_upload()).await.unwrap().await.unwrap();
        assert!(matches!(
            orch.ensure_accepting(id).await.unwrap_err(),
            AppError::Conflict(_)
        ));

        orch.reset(id).await.unwrap();
        let session = orch.session(id).await.unwrap();
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.results.is_none());
        assert!(session.upload.error.is_none());
        orch.ensure_accepting(id).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_upload_clears_previous_error() {
        let orch = orchestrator("no json here", Duration::from_millis(10));
        let id = orch.new_session().await;
        orch.start(id, pdf_upload()).await.unwrap().await.unwrap();
        assert!(orch.session(id).await.unwrap().upload.error.is_some());

        let handle = orch.start(id, pdf_upload()).await.unwrap();
        assert!(orch.session(id).await.unwrap().upload.error.is_none());
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let orch = orchestrator(SCENARIO_JSON, Duration::ZERO);
        let err = orch.start(Uuid::new_v4(), pdf_upload()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
