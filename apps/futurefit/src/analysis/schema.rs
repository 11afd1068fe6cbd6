//! Analysis result schema — the contract between the inference call and the renderer.
//!
//! The model is asked for this exact shape but nothing forces it to comply, so
//! every field deserializes leniently: unknown enum labels become `Unknown`,
//! scores are clamped to 1–10, missing strings and lists default to empty, and
//! list entries that are not objects are dropped.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

// ────────────────────────────────────────────────────────────────────────────
// Label sets the model chooses from
// ────────────────────────────────────────────────────────────────────────────

/// A closed set of labels. Anything outside the set parses as the
/// `Default` variant, which every implementor reserves for unknown labels.
pub trait Label: Copy + Default + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_label(raw: &str) -> Self {
        let raw = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|known| known.label().eq_ignore_ascii_case(raw))
            .unwrap_or_default()
    }
}

/// Categorical estimate of a career's automation exposure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
    #[default]
    Unknown,
}

impl Label for RiskLevel {
    const ALL: &'static [Self] = &[Self::Low, Self::Medium, Self::High, Self::Critical];

    fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
            Self::Unknown => "Unknown",
        }
    }
}

/// Priority for acting on a certification recommendation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Urgency {
    Low,
    Medium,
    High,
    #[default]
    Unknown,
}

impl Label for Urgency {
    const ALL: &'static [Self] = &[Self::Low, Self::Medium, Self::High];

    fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum DegreeLevel {
    Bachelor,
    Master,
    PhD,
    Certificate,
    #[default]
    Unknown,
}

impl Label for DegreeLevel {
    const ALL: &'static [Self] = &[Self::Bachelor, Self::Master, Self::PhD, Self::Certificate];

    fn label(self) -> &'static str {
        match self {
            Self::Bachelor => "Bachelor",
            Self::Master => "Master",
            Self::PhD => "PhD",
            Self::Certificate => "Certificate",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum LearningCurve {
    Easy,
    Medium,
    Hard,
    #[default]
    Unknown,
}

impl Label for LearningCurve {
    const ALL: &'static [Self] = &[Self::Easy, Self::Medium, Self::Hard];

    fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Unknown => "Unknown",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scores
// ────────────────────────────────────────────────────────────────────────────

/// Relevance or impact rating, always within 1–10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score(u8);

impl Score {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: i64) -> Self {
        Score(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Score {
    fn default() -> Self {
        Score(Self::MIN)
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(as_integer(&value).map(Score::new).unwrap_or_default())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Result models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    #[serde(default, deserialize_with = "lenient_years")]
    pub years_until_replacement: u32,
    #[serde(default, deserialize_with = "lenient_label")]
    pub risk_level: RiskLevel,
    #[serde(default, deserialize_with = "lenient_string")]
    pub reasoning: String,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub key_vulnerabilities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub provider: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub estimated_duration: String,
    #[serde(default)]
    pub relevance_score: Score,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_label")]
    pub urgency: Urgency,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DegreeProgram {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_label")]
    pub level: DegreeLevel,
    #[serde(default, deserialize_with = "lenient_string")]
    pub field: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub estimated_duration: String,
    #[serde(default)]
    pub relevance_score: Score,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiTool {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_label")]
    pub learning_curve: LearningCurve,
    #[serde(default)]
    pub impact_level: Score,
    /// Only absolute http(s) URLs survive parsing.
    #[serde(
        default,
        deserialize_with = "lenient_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub url: Option<String>,
}

/// Full structured output of one resume analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub ai_replacement_timeline: Timeline,
    #[serde(default, deserialize_with = "lenient_list")]
    pub recommended_certifications: Vec<Certification>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub degree_programs: Vec<DegreeProgram>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub ai_tools: Vec<AiTool>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub overall_recommendation: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient field parsers
// ────────────────────────────────────────────────────────────────────────────

/// Integers, floats (rounded) and numeric strings.
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64)),
        Value::String(s) => {
            let s = s.trim().trim_end_matches('+').trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.round() as i64)
            })
        }
        _ => None,
    }
}

fn lenient_label<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Label,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => T::from_label(&s),
        _ => T::default(),
    })
}

fn lenient_years<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(as_integer(&value)
        .map(|n| n.clamp(0, u32::MAX as i64) as u32)
        .unwrap_or(0))
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(value).unwrap_or_default())
}

fn lenient_string_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(scalar_to_string)
        .filter(|s| !s.trim().is_empty())
        .collect())
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        other => {
            warn!("Expected a list in analysis result, got {other}; using an empty list");
            return Ok(Vec::new());
        }
    };
    Ok(items
        .into_iter()
        .filter_map(|item| {
            if !item.is_object() {
                warn!("Dropping non-object list entry from analysis result: {item}");
                return None;
            }
            match serde_json::from_value(item) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    warn!("Dropping malformed list entry from analysis result: {e}");
                    None
                }
            }
        })
        .collect())
}

fn lenient_url<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => {
            let s = s.trim();
            let lower = s.to_ascii_lowercase();
            let is_web = lower.starts_with("https://") || lower.starts_with("http://");
            let has_host = s.split_once("://").is_some_and(|(_, rest)| !rest.is_empty());
            (is_web && has_host && !s.chars().any(char::is_whitespace)).then(|| s.to_string())
        }
        _ => None,
    })
}
