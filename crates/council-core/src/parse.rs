//! Turning free-form model output back into records.
//!
//! Generated text is unstructured, so parsing is a best-effort fallback chain:
//!
//! ```text
//! fenced ```json block ──▶ whole text as JSON ──▶ line heuristics ──▶ raw text
//! ```
//!
//! Each stage runs only when the one before it produced nothing usable. The
//! stage that won is reported as a [`ParseStrategy`]. None of these functions
//! panic or fail; the worst case is the trimmed input echoed back.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Shape descriptors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListField {
    Recommendations,
    Concerns,
    Flags,
}

impl ListField {
    pub const ALL: [ListField; 3] = [
        ListField::Recommendations,
        ListField::Concerns,
        ListField::Flags,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ListField::Recommendations => "recommendations",
            ListField::Concerns => "concerns",
            ListField::Flags => "flags",
        }
    }

    fn title(self) -> &'static str {
        match self {
            ListField::Recommendations => "Recommendations",
            ListField::Concerns => "Concerns",
            ListField::Flags => "Flags",
        }
    }

    /// Match a section heading such as `Concerns:` or `## Recommendations`.
    fn from_heading(heading: &str) -> Option<Self> {
        match heading.to_ascii_lowercase().as_str() {
            "recommendations" | "recommendation" | "actions" => Some(ListField::Recommendations),
            "concerns" | "concern" | "risks" => Some(ListField::Concerns),
            "flags" | "flag" | "red flags" => Some(ListField::Flags),
            _ => None,
        }
    }
}

/// What one role's answers look like.
#[derive(Debug, Clone, Copy)]
pub struct ResponseShape {
    /// Role key stamped on every record, whatever the text claims.
    pub agent: &'static str,
    /// Lists this role reports; others are ignored when decoding.
    pub list_fields: &'static [ListField],
    /// Where unlabelled bullet lines go.
    pub bullet_field: ListField,
    /// Role-specific free-text keys, e.g. `observation`.
    pub text_fields: &'static [&'static str],
}

impl ResponseShape {
    fn reports(&self, field: ListField) -> bool {
        self.list_fields.contains(&field)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One role's structured answer. Lists and confidence are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredResponse {
    pub agent: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub concerns: Vec<String>,
    #[serde(default)]
    pub flags: Vec<String>,
    /// Always within `[0, 1]`.
    #[serde(default)]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment: Option<String>,
}

impl StructuredResponse {
    pub fn empty(agent: &str) -> Self {
        Self {
            agent: agent.to_string(),
            recommendations: Vec::new(),
            concerns: Vec::new(),
            flags: Vec::new(),
            confidence: 0.0,
            assessment: None,
        }
    }

    /// A record whose only recommendation is an error note.
    pub fn error(agent: &str, message: impl Into<String>) -> Self {
        Self {
            recommendations: vec![message.into()],
            ..Self::empty(agent)
        }
    }

    pub fn list(&self, field: ListField) -> &[String] {
        match field {
            ListField::Recommendations => &self.recommendations,
            ListField::Concerns => &self.concerns,
            ListField::Flags => &self.flags,
        }
    }

    fn list_mut(&mut self, field: ListField) -> &mut Vec<String> {
        match field {
            ListField::Recommendations => &mut self.recommendations,
            ListField::Concerns => &mut self.concerns,
            ListField::Flags => &mut self.flags,
        }
    }
}

/// Which stage of the fallback chain produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStrategy {
    JsonBlock,
    DirectJson,
    HeuristicLines,
    RawText,
    NoResponse,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub value: T,
    pub strategy: ParseStrategy,
}

/// Which conversational turn a text answer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Brief,
    Reply,
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Turn::Brief => "brief",
            Turn::Reply => "reply",
        })
    }
}

pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Structured parsing
// ---------------------------------------------------------------------------

/// Parse generated text into a [`StructuredResponse`] for `shape`.
///
/// `None` or blank input yields an error-tagged record.
pub fn parse_structured(raw: Option<&str>, shape: &ResponseShape) -> Parsed<StructuredResponse> {
    let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        tracing::error!(agent = shape.agent, "no response to parse");
        return Parsed {
            value: StructuredResponse::error(
                shape.agent,
                format!(
                    "Error: Failed to get a response from the LLM for {} agent.",
                    shape.agent
                ),
            ),
            strategy: ParseStrategy::NoResponse,
        };
    };

    if let Some(record) = fenced_json(text)
        .and_then(|block| serde_json::from_str::<Value>(block).ok())
        .and_then(|value| record_from_value(&value, shape))
    {
        return Parsed {
            value: record,
            strategy: ParseStrategy::JsonBlock,
        };
    }

    if let Some(record) = serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|value| record_from_value(&value, shape))
    {
        return Parsed {
            value: record,
            strategy: ParseStrategy::DirectJson,
        };
    }

    if let Some(record) = record_from_lines(text, shape) {
        return Parsed {
            value: record,
            strategy: ParseStrategy::HeuristicLines,
        };
    }

    tracing::warn!(agent = shape.agent, "no structure recovered, keeping raw text");
    Parsed {
        value: StructuredResponse {
            recommendations: vec![text.to_string()],
            ..StructuredResponse::empty(shape.agent)
        },
        strategy: ParseStrategy::RawText,
    }
}

/// Decode a JSON value. Anything but an object carrying at least one known
/// field, or a known list field that is not an array, yields `None`.
fn record_from_value(value: &Value, shape: &ResponseShape) -> Option<StructuredResponse> {
    let obj = value.as_object()?;
    let mut record = StructuredResponse::empty(shape.agent);
    let mut recognized = false;

    for &field in shape.list_fields {
        match obj.get(field.key()) {
            None | Some(Value::Null) => {}
            Some(Value::Array(items)) => {
                recognized = true;
                *record.list_mut(field) = items.iter().filter_map(item_text).collect();
            }
            Some(_) => return None,
        }
    }

    match obj.get("confidence") {
        None | Some(Value::Null) => {}
        Some(value) => {
            recognized = true;
            record.confidence = confidence_from(value);
        }
    }

    if let Some(text) = first_text_field(obj, std::iter::once("assessment").chain(shape.text_fields.iter().copied())) {
        recognized = true;
        record.assessment = Some(text);
    }

    recognized.then_some(record)
}

fn confidence_from(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    raw.map(clamp_confidence).unwrap_or(0.0)
}

fn item_text(item: &Value) -> Option<String> {
    match item {
        Value::String(s) => Some(s.trim()).filter(|s| !s.is_empty()).map(str::to_string),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn first_text_field<'a>(
    obj: &Map<String, Value>,
    keys: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    keys.into_iter()
        .filter_map(|key| obj.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Line heuristics: numbered lines, bullets, a bare confidence number and
/// section headings. The first plain line becomes the assessment.
fn record_from_lines(text: &str, shape: &ResponseShape) -> Option<StructuredResponse> {
    let mut record = StructuredResponse::empty(shape.agent);
    let mut section: Option<ListField> = None;
    let mut found = false;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.starts_with("```") {
            continue;
        }
        if let Some(caps) = numbered_re().captures(line) {
            let field = section.unwrap_or(ListField::Recommendations);
            push_item(&mut record, shape, field, &caps[1]);
            found = true;
        } else if let Some(caps) = bullet_re().captures(line) {
            let field = section.unwrap_or(shape.bullet_field);
            push_item(&mut record, shape, field, &caps[1]);
            found = true;
        } else if let Some(value) = confidence_re()
            .captures(line)
            .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
            .and_then(|m| m.as_str().parse::<f64>().ok())
        {
            record.confidence = clamp_confidence(value);
            found = true;
        } else if let Some(heading) = heading_text(line) {
            section = ListField::from_heading(heading).filter(|f| shape.reports(*f));
        } else if record.assessment.is_none() {
            record.assessment = Some(line.to_string());
        }
    }

    found.then_some(record)
}

fn push_item(record: &mut StructuredResponse, shape: &ResponseShape, field: ListField, item: &str) {
    let item = item.trim();
    if item.is_empty() {
        return;
    }
    let field = if shape.reports(field) {
        field
    } else {
        shape.bullet_field
    };
    record.list_mut(field).push(item.to_string());
}

/// `## Concerns`, `**Flags:**` or `Recommendations:` → the heading text.
fn heading_text(line: &str) -> Option<&str> {
    let is_heading = line.starts_with('#') || line.trim_end_matches('*').ends_with(':');
    if !is_heading {
        return None;
    }
    let text = line
        .trim_start_matches('#')
        .trim_matches('*')
        .trim()
        .trim_end_matches(':')
        .trim_matches('*')
        .trim();
    Some(text)
}

// ---------------------------------------------------------------------------
// Conversational parsing
// ---------------------------------------------------------------------------

/// Keys that carry prose in any role's JSON answer, in display order.
const PROSE_FIELDS: [&str; 4] = ["brief", "reply", "message", "summary"];

/// Parse generated text into the string shown to the user for one turn.
///
/// JSON answers are flattened into prose followed by labelled bullet
/// sections; anything else is returned trimmed.
pub fn parse_conversational(raw: Option<&str>, shape: &ResponseShape, turn: Turn) -> Parsed<String> {
    let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        tracing::error!(agent = shape.agent, %turn, "no response to parse");
        return Parsed {
            value: format!("Error: Failed to get {turn} from LLM."),
            strategy: ParseStrategy::NoResponse,
        };
    };

    if let Some(flat) = fenced_json(text)
        .and_then(|block| serde_json::from_str::<Value>(block).ok())
        .and_then(|value| flatten_object(&value, shape))
    {
        return Parsed {
            value: flat,
            strategy: ParseStrategy::JsonBlock,
        };
    }

    if let Some(flat) = serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|value| flatten_object(&value, shape))
    {
        return Parsed {
            value: flat,
            strategy: ParseStrategy::DirectJson,
        };
    }

    Parsed {
        value: text.to_string(),
        strategy: ParseStrategy::RawText,
    }
}

fn flatten_object(value: &Value, shape: &ResponseShape) -> Option<String> {
    let obj = value.as_object()?;
    let mut blocks = Vec::new();

    let prose: Vec<&str> = PROSE_FIELDS
        .iter()
        .chain(shape.text_fields)
        .filter_map(|key| obj.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if !prose.is_empty() {
        blocks.push(prose.join("\n"));
    }

    for field in ListField::ALL {
        let Some(Value::Array(items)) = obj.get(field.key()) else {
            continue;
        };
        let bullets: Vec<String> = items
            .iter()
            .filter_map(item_text)
            .map(|item| format!("- {item}"))
            .collect();
        if !bullets.is_empty() {
            blocks.push(format!("{}:\n{}", field.title(), bullets.join("\n")));
        }
    }

    if blocks.is_empty() {
        tracing::warn!(agent = shape.agent, "JSON answer had no displayable fields");
        None
    } else {
        Some(blocks.join("\n\n"))
    }
}

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

static FENCED_RE: OnceLock<Regex> = OnceLock::new();
static NUMBERED_RE: OnceLock<Regex> = OnceLock::new();
static BULLET_RE: OnceLock<Regex> = OnceLock::new();
static CONFIDENCE_RE: OnceLock<Regex> = OnceLock::new();

fn fenced_re() -> &'static Regex {
    FENCED_RE.get_or_init(|| Regex::new(r"(?s)```[ \t]*(?i:json)?[ \t]*\r?\n?(\{.*?\})\s*```").unwrap())
}

fn numbered_re() -> &'static Regex {
    NUMBERED_RE.get_or_init(|| Regex::new(r"^\d+[.)]\s+(.+)$").unwrap())
}

fn bullet_re() -> &'static Regex {
    BULLET_RE.get_or_init(|| Regex::new(r"^[-*•]\s+(.+)$").unwrap())
}

/// A labelled number (`Confidence: 1`) or a bare decimal (`0.8`). Bare
/// integers are left alone so a line like `2024` is not read as a score.
fn confidence_re() -> &'static Regex {
    CONFIDENCE_RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:confidence(?:\s+score)?\s*[:=]?\s*(-?(?:\d+(?:\.\d+)?|\.\d+))|(-?(?:\d+\.\d+|\.\d+)))$",
        )
        .unwrap()
    })
}

/// The body of the first fenced JSON object in `text`, if any.
pub fn fenced_json(text: &str) -> Option<&str> {
    fenced_re()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const STRATEGY: ResponseShape = ResponseShape {
        agent: "strategy",
        list_fields: &ListField::ALL,
        bullet_field: ListField::Recommendations,
        text_fields: &[],
    };

    const ETHICS: ResponseShape = ResponseShape {
        agent: "ethics",
        list_fields: &ListField::ALL,
        bullet_field: ListField::Concerns,
        text_fields: &[],
    };

    const WELLNESS: ResponseShape = ResponseShape {
        agent: "wellness",
        list_fields: &[ListField::Recommendations, ListField::Concerns],
        bullet_field: ListField::Recommendations,
        text_fields: &["observation"],
    };

    #[test]
    fn fenced_block_recommendations_verbatim() {
        let raw = "Here is my take:\n```json\n{\"recommendations\": [\"Fix CI\", \"Write docs\", \"Ship v1\"], \"confidence\": 0.7}\n```\nThanks!";
        let parsed = parse_structured(Some(raw), &STRATEGY);
        assert_eq!(parsed.strategy, ParseStrategy::JsonBlock);
        assert_eq!(parsed.value.recommendations, ["Fix CI", "Write docs", "Ship v1"]);
        assert_eq!(parsed.value.confidence, 0.7);
        assert!(parsed.value.concerns.is_empty());
    }

    #[test]
    fn fenced_block_with_nested_object() {
        let raw = "```json\n{\"recommendations\": [\"a\"], \"meta\": {\"k\": 1}}\n```";
        let parsed = parse_structured(Some(raw), &STRATEGY);
        assert_eq!(parsed.strategy, ParseStrategy::JsonBlock);
        assert_eq!(parsed.value.recommendations, ["a"]);
    }

    #[test]
    fn agent_name_in_payload_is_ignored() {
        let raw = r#"{"agent": "marketing", "recommendations": ["x"]}"#;
        let parsed = parse_structured(Some(raw), &STRATEGY);
        assert_eq!(parsed.strategy, ParseStrategy::DirectJson);
        assert_eq!(parsed.value.agent, "strategy");
    }

    #[test]
    fn confidence_is_clamped() {
        let high = parse_structured(Some(r#"{"recommendations": [], "confidence": 4.2}"#), &STRATEGY);
        assert_eq!(high.value.confidence, 1.0);
        let low = parse_structured(Some(r#"{"recommendations": [], "confidence": -3}"#), &STRATEGY);
        assert_eq!(low.value.confidence, 0.0);
        let text = parse_structured(Some(r#"{"confidence": "0.25"}"#), &STRATEGY);
        assert_eq!(text.value.confidence, 0.25);
        let lines = parse_structured(Some("1. do it\n7.5"), &STRATEGY);
        assert_eq!(lines.value.confidence, 1.0);
    }

    #[test]
    fn bare_integers_are_not_confidence() {
        let year = parse_structured(Some("2024"), &STRATEGY);
        assert_eq!(year.strategy, ParseStrategy::RawText);
        assert_eq!(year.value.confidence, 0.0);

        let lines = parse_structured(Some("1. Ship the beta\n3"), &STRATEGY);
        assert_eq!(lines.value.confidence, 0.0);
        assert_eq!(lines.value.assessment.as_deref(), Some("3"));

        let labelled = parse_structured(Some("1. Ship the beta\nConfidence: 1"), &STRATEGY);
        assert_eq!(labelled.value.confidence, 1.0);
    }

    #[test]
    fn non_array_list_falls_through_to_lines() {
        let raw = r#"{"recommendations": "just one string"}"#;
        let parsed = parse_structured(Some(raw), &STRATEGY);
        assert_ne!(parsed.strategy, ParseStrategy::DirectJson);
        assert_eq!(parsed.strategy, ParseStrategy::RawText);
        assert_eq!(parsed.value.recommendations, [raw]);
    }

    #[test]
    fn non_object_json_falls_through() {
        let parsed = parse_structured(Some(r#"["a", "b"]"#), &STRATEGY);
        assert_eq!(parsed.strategy, ParseStrategy::RawText);
        let parsed = parse_structured(Some("0.4"), &STRATEGY);
        // A bare number is still a confidence line.
        assert_eq!(parsed.strategy, ParseStrategy::HeuristicLines);
        assert_eq!(parsed.value.confidence, 0.4);
    }

    #[test]
    fn broken_fence_falls_back_to_lines() {
        let raw = "```json\n{\"recommendations\": [\"a\",}\n```\n1. Fix the build\n- Burnout risk";
        let parsed = parse_structured(Some(raw), &ETHICS);
        assert_eq!(parsed.strategy, ParseStrategy::HeuristicLines);
        assert_eq!(parsed.value.recommendations, ["Fix the build"]);
        assert_eq!(parsed.value.concerns, ["Burnout risk"]);
    }

    #[test]
    fn heuristic_lines_route_by_role_and_heading() {
        let raw = "\
Overall the plan is sound.
1. Cut scope to the export feature
2. Pair on the flaky test
- Late nights are piling up
Flags:
- Vendor contract renews Friday
0.8";
        let parsed = parse_structured(Some(raw), &ETHICS);
        assert_eq!(parsed.strategy, ParseStrategy::HeuristicLines);
        let r = parsed.value;
        assert_eq!(r.agent, "ethics");
        assert_eq!(
            r.recommendations,
            ["Cut scope to the export feature", "Pair on the flaky test"]
        );
        assert_eq!(r.concerns, ["Late nights are piling up"]);
        assert_eq!(r.flags, ["Vendor contract renews Friday"]);
        assert_eq!(r.confidence, 0.8);
        assert_eq!(r.assessment.as_deref(), Some("Overall the plan is sound."));
    }

    #[test]
    fn heading_for_unreported_list_uses_bullet_field() {
        let raw = "Flags:\n- Skipping lunch again";
        let parsed = parse_structured(Some(raw), &WELLNESS);
        assert_eq!(parsed.value.recommendations, ["Skipping lunch again"]);
        assert!(parsed.value.flags.is_empty());
    }

    #[test]
    fn labelled_confidence_line() {
        let parsed = parse_structured(Some("- rest\nConfidence: 0.85"), &WELLNESS);
        assert_eq!(parsed.value.confidence, 0.85);
        assert_eq!(parsed.value.recommendations, ["rest"]);
    }

    #[test]
    fn plain_prose_is_raw_text() {
        let parsed = parse_structured(Some("  Looks fine, ship it.\n"), &STRATEGY);
        assert_eq!(parsed.strategy, ParseStrategy::RawText);
        assert_eq!(parsed.value.recommendations, ["Looks fine, ship it."]);
        assert_eq!(parsed.value.confidence, 0.0);
        assert!(parsed.value.concerns.is_empty());
        assert!(parsed.value.flags.is_empty());
    }

    #[test]
    fn missing_response_is_error_record() {
        for raw in [None, Some(""), Some("   \n")] {
            let parsed = parse_structured(raw, &STRATEGY);
            assert_eq!(parsed.strategy, ParseStrategy::NoResponse);
            assert_eq!(parsed.value.agent, "strategy");
            assert_eq!(parsed.value.recommendations.len(), 1);
            assert!(parsed.value.recommendations[0].starts_with("Error:"));
            assert_eq!(parsed.value.confidence, 0.0);
        }
    }

    #[test]
    fn parsing_is_deterministic() {
        let inputs = [
            "```json\n{\"flags\": [\"x\"]}\n```",
            "1. a\n- b\n0.3",
            "prose only",
            "{\"confidence\": 2}",
        ];
        for raw in inputs {
            assert_eq!(
                parse_structured(Some(raw), &ETHICS),
                parse_structured(Some(raw), &ETHICS)
            );
        }
    }

    #[test]
    fn wellness_text_field_becomes_assessment() {
        let raw = r#"{"observation": "Energy is low today.", "recommendations": ["Take a walk"]}"#;
        let parsed = parse_structured(Some(raw), &WELLNESS);
        assert_eq!(parsed.value.assessment.as_deref(), Some("Energy is low today."));
    }

    #[test]
    fn unreported_list_in_json_is_ignored() {
        let raw = r#"{"recommendations": ["Sleep"], "flags": ["ignored"]}"#;
        let parsed = parse_structured(Some(raw), &WELLNESS);
        assert!(parsed.value.flags.is_empty());
    }

    #[test]
    fn serialized_record_always_has_lists_and_confidence() {
        let value = serde_json::to_value(StructuredResponse::empty("product")).unwrap();
        assert_eq!(value["recommendations"], serde_json::json!([]));
        assert_eq!(value["concerns"], serde_json::json!([]));
        assert_eq!(value["flags"], serde_json::json!([]));
        assert_eq!(value["confidence"], serde_json::json!(0.0));
        assert!(value.get("assessment").is_none());
    }

    // --- conversational ---

    #[test]
    fn conversational_plain_text_is_trimmed() {
        let parsed = parse_conversational(Some("  Rest well today.  \n"), &WELLNESS, Turn::Brief);
        assert_eq!(parsed.strategy, ParseStrategy::RawText);
        assert_eq!(parsed.value, "Rest well today.");
    }

    #[test]
    fn conversational_json_is_flattened() {
        let raw = "```json\n{\"brief\": \"Energy looks low.\", \"observation\": \"Third tired day.\", \"recommendations\": [\"Walk\"], \"concerns\": [\"Burnout\"]}\n```";
        let parsed = parse_conversational(Some(raw), &WELLNESS, Turn::Brief);
        assert_eq!(parsed.strategy, ParseStrategy::JsonBlock);
        assert_eq!(
            parsed.value,
            "Energy looks low.\nThird tired day.\n\nRecommendations:\n- Walk\n\nConcerns:\n- Burnout"
        );
    }

    #[test]
    fn conversational_json_without_fields_is_raw() {
        let raw = r#"{"unrelated": 1}"#;
        let parsed = parse_conversational(Some(raw), &STRATEGY, Turn::Reply);
        assert_eq!(parsed.strategy, ParseStrategy::RawText);
        assert_eq!(parsed.value, raw);
    }

    #[test]
    fn conversational_missing_response_names_turn() {
        let brief = parse_conversational(None, &STRATEGY, Turn::Brief);
        assert_eq!(brief.value, "Error: Failed to get brief from LLM.");
        assert_eq!(brief.strategy, ParseStrategy::NoResponse);
        let reply = parse_conversational(Some(""), &STRATEGY, Turn::Reply);
        assert_eq!(reply.value, "Error: Failed to get reply from LLM.");
    }

    #[test]
    fn fenced_json_accepts_untagged_fence() {
        assert_eq!(fenced_json("```\n{\"a\": 1}\n```"), Some("{\"a\": 1}"));
        assert_eq!(fenced_json("no fence {\"a\": 1}"), None);
    }
}
