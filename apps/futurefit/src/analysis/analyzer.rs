//! Resume analyzer — turns an uploaded PDF into a typed `AnalysisResult`.
//!
//! Pipeline: base64-encode → one multimodal call → extract the first JSON
//! object from the reply → parse and sanitize.
//!
//! Every failure keeps its structured kind for logging; callers show the user
//! only `GENERIC_FAILURE_MESSAGE`.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::analysis::extract::extract_json_object;
use crate::analysis::prompts::build_analysis_prompt;
use crate::analysis::schema::AnalysisResult;
use crate::intake::ResumeUpload;
use crate::llm_client::{InlineFile, LlmClient, LlmError};

/// The only failure text a user ever sees for an analysis.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to analyze resume. Please try again.";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("inference call failed: {0}")]
    Inference(#[from] LlmError),

    #[error("Invalid JSON response from AI")]
    NoJson,

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("response does not match the analysis schema: {0}")]
    Schema(String),
}

impl AnalysisError {
    /// Short machine-readable kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Inference(e) => e.kind(),
            AnalysisError::NoJson => "no_json",
            AnalysisError::Parse(_) => "json_parse",
            AnalysisError::Schema(_) => "schema",
        }
    }

    pub fn user_message(&self) -> &'static str {
        GENERIC_FAILURE_MESSAGE
    }
}

/// The analyzer trait. Implement this to swap the inference backend without
/// touching the orchestrator or the handlers.
///
/// Carried in `AppState` as `Arc<dyn ResumeAnalyzer>`.
#[async_trait]
pub trait ResumeAnalyzer: Send + Sync {
    async fn analyze(&self, upload: &ResumeUpload) -> Result<AnalysisResult, AnalysisError>;
}

/// Gemini-backed analyzer. Sends the PDF inline with the fixed analysis prompt.
pub struct GeminiAnalyzer {
    llm: LlmClient,
    prompt: String,
}

impl GeminiAnalyzer {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            prompt: build_analysis_prompt(),
        }
    }
}

#[async_trait]
impl ResumeAnalyzer for GeminiAnalyzer {
    async fn analyze(&self, upload: &ResumeUpload) -> Result<AnalysisResult, AnalysisError> {
        let encoded = BASE64.encode(&upload.bytes);
        info!(
            "Analyzing {} ({} bytes, model: {})",
            upload.file_name,
            upload.bytes.len(),
            self.llm.model()
        );

        let text = self
            .llm
            .call_text(
                &self.prompt,
                InlineFile {
                    mime_type: &upload.mime_type,
                    data: &encoded,
                },
            )
            .await?;

        parse_model_output(&text)
    }
}

/// Extracts, parses and sanitizes the analysis embedded in raw model text.
pub fn parse_model_output(text: &str) -> Result<AnalysisResult, AnalysisError> {
    let json = extract_json_object(text).ok_or(AnalysisError::NoJson)?;
    if json.len() != text.trim().len() {
        debug!(
            "Model wrapped its JSON in {} bytes of extra text",
            text.trim().len() - json.len()
        );
    }

    let value: Value = serde_json::from_str(json)?;
    match value.get("aiReplacementTimeline") {
        Some(Value::Object(_)) => {}
        Some(other) => {
            return Err(AnalysisError::Schema(format!(
                "aiReplacementTimeline must be an object, got {other}"
            )))
        }
        None => {
            return Err(AnalysisError::Schema(
                "missing aiReplacementTimeline".to_string(),
            ))
        }
    }

    serde_json::from_value(value).map_err(|e| AnalysisError::Schema(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::schema::RiskLevel;

    const SCENARIO: &str = r#"{"aiReplacementTimeline":{"yearsUntilReplacement":10,"riskLevel":"Medium","reasoning":"...","keyVulnerabilities":["a","b"]},"recommendedCertifications":[],"degreePrograms":[],"aiTools":[],"overallRecommendation":"..."}"#;

    #[test]
    fn test_parse_pure_json() {
        let result = parse_model_output(SCENARIO).unwrap();
        assert_eq!(result.ai_replacement_timeline.years_until_replacement, 10);
        assert_eq!(result.ai_replacement_timeline.risk_level, RiskLevel::Medium);
        assert_eq!(
            result.ai_replacement_timeline.key_vulnerabilities,
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_parse_json_wrapped_in_prose() {
        let text = format!("Here is the result: {SCENARIO} Thanks");
        let result = parse_model_output(&text).unwrap();
        assert_eq!(result.overall_recommendation, "...");
    }

    #[test]
    fn test_no_braces_is_no_json() {
        let err = parse_model_output("Sorry, I cannot read this file.").unwrap_err();
        assert!(matches!(err, AnalysisError::NoJson));
        assert_eq!(err.to_string(), "Invalid JSON response from AI");
        assert_eq!(err.kind(), "no_json");
    }

    #[test]
    fn test_balanced_but_invalid_json_is_parse_error() {
        let err = parse_model_output("{ this is not json }").unwrap_err();
        assert!(matches!(err, AnalysisError::Parse(_)));
    }

    #[test]
    fn test_missing_timeline_is_schema_error() {
        let err = parse_model_output(r#"{"aiTools": []}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Schema(_)));
        let err = parse_model_output(r#"{"aiReplacementTimeline": "soon"}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Schema(_)));
    }

    #[test]
    fn test_every_error_has_the_same_user_message() {
        let errors = [
            AnalysisError::NoJson,
            AnalysisError::Schema("x".to_string()),
            AnalysisError::Inference(LlmError::EmptyContent),
        ];
        for e in errors {
            assert_eq!(e.user_message(), GENERIC_FAILURE_MESSAGE);
        }
    }

    #[tokio::test]
    async fn test_gemini_analyzer_reports_unreachable_service_as_inference_error() {
        let llm = LlmClient::new(
            "k".to_string(),
            "http://127.0.0.1:9".to_string(),
            "gemini-1.5-flash".to_string(),
            std::time::Duration::from_secs(2),
        )
        .unwrap();
        let upload = ResumeUpload {
            file_name: "cv.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            bytes: bytes::Bytes::from_static(b"%PDF-1.4"),
        };
        let err = GeminiAnalyzer::new(llm).analyze(&upload).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Inference(_)));
    }
}
