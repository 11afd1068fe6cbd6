//! Results renderer — maps an `AnalysisResult` onto five display sections.
//!
//! Formatting only. Enum values pick their badge style from the static tables
//! below; unknown values fall back to the neutral style.

use uuid::Uuid;

use super::escape;
use crate::analysis::schema::{
    AiTool, AnalysisResult, Certification, DegreeProgram, Label, RiskLevel, Timeline, Urgency,
};

// ────────────────────────────────────────────────────────────────────────────
// Badge styles
// ────────────────────────────────────────────────────────────────────────────

const NEUTRAL_BADGE: &str = "text-gray-600 bg-gray-100";

const RISK_BADGES: &[(RiskLevel, &str)] = &[
    (RiskLevel::Low, "text-green-600 bg-green-100"),
    (RiskLevel::Medium, "text-yellow-600 bg-yellow-100"),
    (RiskLevel::High, "text-orange-600 bg-orange-100"),
    (RiskLevel::Critical, "text-red-600 bg-red-100"),
];

const URGENCY_BADGES: &[(Urgency, &str)] = &[
    (Urgency::Low, "text-green-600 bg-green-100"),
    (Urgency::Medium, "text-yellow-600 bg-yellow-100"),
    (Urgency::High, "text-red-600 bg-red-100"),
];

pub fn risk_badge_class(risk: RiskLevel) -> &'static str {
    lookup(RISK_BADGES, risk)
}

pub fn urgency_badge_class(urgency: Urgency) -> &'static str {
    lookup(URGENCY_BADGES, urgency)
}

fn lookup<K: PartialEq + Copy>(table: &[(K, &'static str)], key: K) -> &'static str {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, class)| *class)
        .unwrap_or(NEUTRAL_BADGE)
}

// ────────────────────────────────────────────────────────────────────────────
// Page
// ────────────────────────────────────────────────────────────────────────────

/// Renders the results view with its reset action.
pub fn render_results(results: &AnalysisResult, session_id: Uuid) -> String {
    let certifications: String = results
        .recommended_certifications
        .iter()
        .map(certification_card)
        .collect();
    let degrees: String = results.degree_programs.iter().map(degree_card).collect();
    let tools: String = results.ai_tools.iter().map(tool_card).collect();

    format!(
        r#"<div class="w-full space-y-8" data-phase="results">
  <div class="text-center">
    <h2 class="text-3xl font-bold text-gray-800 mb-2">Your FutureFit Analysis</h2>
    <p class="text-gray-600">AI-powered insights for your career future</p>
  </div>
{timeline}
  <section class="bg-white rounded-xl shadow-lg p-6 border border-gray-200" data-section="certifications">
    <h3 class="text-xl font-semibold text-gray-800 mb-6">Recommended Certifications</h3>
    <div class="grid md:grid-cols-2 lg:grid-cols-3 gap-4">{certifications}</div>
  </section>
  <section class="bg-white rounded-xl shadow-lg p-6 border border-gray-200" data-section="degrees">
    <h3 class="text-xl font-semibold text-gray-800 mb-6">Degree Programs</h3>
    <div class="grid md:grid-cols-2 gap-4">{degrees}</div>
  </section>
  <section class="bg-white rounded-xl shadow-lg p-6 border border-gray-200" data-section="tools">
    <h3 class="text-xl font-semibold text-gray-800 mb-6">AI Tools to Master</h3>
    <div class="grid md:grid-cols-2 lg:grid-cols-3 gap-4">{tools}</div>
  </section>
  <section class="bg-gradient-to-r from-blue-50 to-purple-50 rounded-xl p-6 border border-blue-200" data-section="summary">
    <h3 class="text-xl font-semibold text-gray-800 mb-4">Overall Recommendation</h3>
    <p class="text-gray-700 leading-relaxed">{summary}</p>
  </section>
  <form method="post" action="/sessions/{session_id}/reset" class="text-center">
    <button type="submit" class="px-6 py-3 bg-blue-600 text-white font-medium rounded-lg hover:bg-blue-700">Analyze Another Resume</button>
  </form>
</div>"#,
        timeline = timeline_section(&results.ai_replacement_timeline),
        summary = escape(&results.overall_recommendation),
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Sections and cards
// ────────────────────────────────────────────────────────────────────────────

fn timeline_section(timeline: &Timeline) -> String {
    let vulnerabilities: String = timeline
        .key_vulnerabilities
        .iter()
        .map(|v| {
            format!(
                r#"<li class="text-sm text-gray-600" data-vulnerability>{}</li>"#,
                escape(v)
            )
        })
        .collect();

    format!(
        r#"  <section class="bg-white rounded-xl shadow-lg p-6 border border-gray-200" data-section="timeline">
    <h3 class="text-xl font-semibold text-gray-800 mb-4">AI Replacement Timeline</h3>
    <div class="grid md:grid-cols-2 gap-6">
      <div>
        <div class="flex items-center space-x-4 mb-4">
          <div class="text-3xl font-bold text-blue-600">{years}+ years</div>
          <span class="px-3 py-1 rounded-full text-sm font-medium {badge}">{risk} Risk</span>
        </div>
        <p class="text-gray-600 mb-4">{reasoning}</p>
      </div>
      <div>
        <h4 class="font-medium text-gray-800 mb-3">Key Vulnerabilities</h4>
        <ul class="space-y-2 list-disc list-inside">{vulnerabilities}</ul>
      </div>
    </div>
  </section>"#,
        years = timeline.years_until_replacement,
        badge = risk_badge_class(timeline.risk_level),
        risk = timeline.risk_level.label(),
        reasoning = escape(&timeline.reasoning),
    )
}

fn certification_card(cert: &Certification) -> String {
    format!(
        r#"
      <article class="border border-gray-200 rounded-lg p-4" data-card="certification">
        <div class="flex items-start justify-between mb-3">
          <h4 class="font-medium text-gray-800 flex-1">{name}</h4>
          <span class="px-2 py-1 rounded text-xs font-medium {badge}">{urgency}</span>
        </div>
        <p class="text-sm text-gray-600 mb-3">{provider}</p>
        <p class="text-sm text-gray-600 mb-3">{description}</p>
        <div class="flex items-center justify-between text-sm">
          <span class="text-gray-500">{duration}</span>
          <span class="text-gray-600">{score}/10</span>
        </div>
      </article>"#,
        name = escape(&cert.name),
        badge = urgency_badge_class(cert.urgency),
        urgency = cert.urgency.label(),
        provider = escape(&cert.provider),
        description = escape(&cert.description),
        duration = escape(&cert.estimated_duration),
        score = cert.relevance_score.get(),
    )
}

fn degree_card(degree: &DegreeProgram) -> String {
    format!(
        r#"
      <article class="border border-gray-200 rounded-lg p-4" data-card="degree">
        <div class="flex items-start justify-between mb-3">
          <div>
            <h4 class="font-medium text-gray-800">{title}</h4>
            <p class="text-sm text-gray-500">{level} in {field}</p>
          </div>
          <span class="text-sm text-gray-600">{score}/10</span>
        </div>
        <p class="text-sm text-gray-600 mb-3">{description}</p>
        <p class="text-sm text-gray-500">{duration}</p>
      </article>"#,
        title = escape(&degree.title),
        level = degree.level.label(),
        field = escape(&degree.field),
        score = degree.relevance_score.get(),
        description = escape(&degree.description),
        duration = escape(&degree.estimated_duration),
    )
}

fn tool_card(tool: &AiTool) -> String {
    let name = match &tool.url {
        Some(url) => format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer" class="hover:underline">{}</a>"#,
            escape(url),
            escape(&tool.name)
        ),
        None => escape(&tool.name),
    };

    format!(
        r#"
      <article class="border border-gray-200 rounded-lg p-4" data-card="tool">
        <h4 class="font-medium text-gray-800 mb-3">{name}</h4>
        <p class="text-sm text-purple-600 mb-2">{category}</p>
        <p class="text-sm text-gray-600 mb-3">{description}</p>
        <div class="flex items-center justify-between text-sm">
          <span class="text-gray-500">{curve} to learn</span>
          <span class="text-gray-600">{impact}/10</span>
        </div>
      </article>"#,
        category = escape(&tool.category),
        description = escape(&tool.description),
        curve = tool.learning_curve.label(),
        impact = tool.impact_level.get(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scenario() -> AnalysisResult {
        serde_json::from_value(json!({
            "aiReplacementTimeline": {
                "yearsUntilReplacement": 10,
                "riskLevel": "Medium",
                "reasoning": "...",
                "keyVulnerabilities": ["a", "b"]
            },
            "recommendedCertifications": [],
            "degreePrograms": [],
            "aiTools": [],
            "overallRecommendation": "..."
        }))
        .unwrap()
    }

    fn cards(html: &str, kind: &str) -> usize {
        html.matches(&format!(r#"data-card="{kind}""#)).count()
    }

    #[test]
    fn test_concrete_scenario_renders_timeline_and_no_cards() {
        let html = render_results(&scenario(), Uuid::new_v4());
        assert!(html.contains("10+ years"));
        assert!(html.contains("Medium Risk"));
        assert!(html.contains("text-yellow-600 bg-yellow-100"));
        assert_eq!(html.matches("data-vulnerability").count(), 2);
        assert_eq!(cards(&html, "certification"), 0);
        assert_eq!(cards(&html, "degree"), 0);
        assert_eq!(cards(&html, "tool"), 0);
    }

    #[test]
    fn test_one_card_per_list_entry() {
        let mut result = scenario();
        result.recommended_certifications = vec![Certification::default(); 3];
        result.degree_programs = vec![DegreeProgram::default(); 2];
        result.ai_tools = vec![AiTool::default(); 5];

        let html = render_results(&result, Uuid::new_v4());
        assert_eq!(cards(&html, "certification"), 3);
        assert_eq!(cards(&html, "degree"), 2);
        assert_eq!(cards(&html, "tool"), 5);
    }

    #[test]
    fn test_all_five_sections_present() {
        let html = render_results(&scenario(), Uuid::new_v4());
        for section in ["timeline", "certifications", "degrees", "tools", "summary"] {
            assert!(html.contains(&format!(r#"data-section="{section}""#)));
        }
    }

    #[test]
    fn test_card_formatting() {
        let mut result = scenario();
        result.recommended_certifications = vec![serde_json::from_value(json!({
            "name": "PMP", "provider": "PMI", "estimatedDuration": "3 months",
            "relevanceScore": 8, "description": "d", "urgency": "High"
        }))
        .unwrap()];
        result.degree_programs = vec![serde_json::from_value(json!({
            "title": "MBA", "level": "Master", "field": "Business", "relevanceScore": 6
        }))
        .unwrap()];
        result.ai_tools = vec![serde_json::from_value(json!({
            "name": "Notion AI", "learningCurve": "Easy", "impactLevel": 7,
            "url": "https://notion.so"
        }))
        .unwrap()];

        let html = render_results(&result, Uuid::new_v4());
        assert!(html.contains("8/10"));
        assert!(html.contains("text-red-600 bg-red-100"));
        assert!(html.contains("Master in Business"));
        assert!(html.contains("6/10"));
        assert!(html.contains("Easy to learn"));
        assert!(html.contains("7/10"));
        assert!(html.contains(r#"href="https://notion.so""#));
    }

    #[test]
    fn test_risk_table_covers_every_level() {
        assert_eq!(risk_badge_class(RiskLevel::Low), "text-green-600 bg-green-100");
        assert_eq!(risk_badge_class(RiskLevel::High), "text-orange-600 bg-orange-100");
        assert_eq!(risk_badge_class(RiskLevel::Critical), "text-red-600 bg-red-100");
        assert_eq!(risk_badge_class(RiskLevel::Unknown), NEUTRAL_BADGE);
        assert_eq!(urgency_badge_class(Urgency::Unknown), NEUTRAL_BADGE);
    }

    #[test]
    fn test_model_text_is_escaped() {
        let mut result = scenario();
        result.overall_recommendation = "<img src=x onerror=alert(1)>".to_string();
        let html = render_results(&result, Uuid::new_v4());
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
    }

    #[test]
    fn test_reset_action_targets_session() {
        let id = Uuid::new_v4();
        let html = render_results(&scenario(), id);
        assert!(html.contains(&format!(r#"action="/sessions/{id}/reset""#)));
        assert!(html.contains("Analyze Another Resume"));
    }
}
