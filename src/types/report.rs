// src/types/report.rs
//! Structured resume analysis as returned by the model.
//!
//! Decoding is lenient: the model does not always honour the requested shape,
//! so scores may arrive as strings and list items as bare strings or objects.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub const GENERIC_RISK_TITLE: &str = "Generic Risk Title";
pub const GENERIC_SUGGESTION_TITLE: &str = "Generic Suggestion";
pub const MISSING_EXPLANATION: &str = "No explanation provided.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(default, deserialize_with = "null_as_default")]
    pub overall_score: Score,
    #[serde(default, deserialize_with = "null_as_default")]
    pub score_reason: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary_rewrite: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key_skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ats_risks: Vec<AtsItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ats_improvements: Vec<AtsItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub predicted_roles: Vec<PredictedRole>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub detailed_suggestions: String,
}

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Score {
    Value(f64),
    Text(String),
}

impl Default for Score {
    fn default() -> Self {
        Score::Text("N/A".to_string())
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Value(v) if v.fract() == 0.0 => write!(f, "{}", *v as i64),
            Score::Value(v) => write!(f, "{:.1}", v),
            Score::Text(s) => f.write_str(s),
        }
    }
}

/// One ATS risk or improvement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AtsItem {
    Text(String),
    Detailed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        risk: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        item: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        suggestion: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedRole {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub explanation: String,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl AtsItem {
    /// Title lookup order: `risk`, `item`, `explanation`, then `fallback`.
    /// `suggestion` is kept in the JSON view only.
    pub fn title<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            AtsItem::Text(text) if !text.trim().is_empty() => text.trim(),
            AtsItem::Text(_) => fallback,
            AtsItem::Detailed {
                risk,
                item,
                explanation,
                ..
            } => non_empty(risk)
                .or_else(|| non_empty(item))
                .or_else(|| non_empty(explanation))
                .unwrap_or(fallback),
        }
    }

    pub fn explanation(&self) -> Option<&str> {
        match self {
            AtsItem::Text(_) => None,
            AtsItem::Detailed { explanation, .. } => non_empty(explanation),
        }
    }

    /// `title: explanation`, or just the title for bare-string items.
    pub fn display_line(&self, fallback_title: &str) -> String {
        match self {
            AtsItem::Text(_) => self.title(fallback_title).to_string(),
            AtsItem::Detailed { .. } => format!(
                "{}: {}",
                self.title(fallback_title),
                self.explanation().unwrap_or(MISSING_EXPLANATION)
            ),
        }
    }
}

impl PredictedRole {
    pub fn new(title: &str, explanation: &str) -> Self {
        Self {
            title: title.to_string(),
            explanation: explanation.to_string(),
        }
    }
}

impl AnalysisReport {
    /// Placeholder stored when the model call or reply parsing fails
    pub fn failed(reason: impl fmt::Display) -> Self {
        Self {
            overall_score: Score::Text("Error".to_string()),
            score_reason: format!("Analysis failed: {}", reason),
            summary_rewrite: "N/A".to_string(),
            key_skills: vec!["N/A".to_string()],
            ats_risks: vec![AtsItem::Text("N/A".to_string())],
            ats_improvements: vec![AtsItem::Text("N/A".to_string())],
            predicted_roles: vec![PredictedRole::new("N/A", "Error")],
            detailed_suggestions: "An error occurred during analysis. \
                Please check the server console for details."
                .to_string(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(&self.overall_score, Score::Text(s) if s == "Error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_mixed_item_shapes() {
        let report: AnalysisReport = serde_json::from_value(json!({
            "overall_score": 78,
            "score_reason": "Solid",
            "key_skills": ["Rust", "SQL"],
            "ats_risks": [
                {"risk": "Tables", "explanation": "Parsers skip tables"},
                "Header graphics"
            ],
            "ats_improvements": [{"item": "Add keywords"}],
            "predicted_roles": [{"title": "Backend Engineer", "explanation": "APIs"}]
        }))
        .unwrap();

        assert_eq!(report.overall_score.to_string(), "78");
        assert_eq!(
            report.ats_risks[0].display_line(GENERIC_RISK_TITLE),
            "Tables: Parsers skip tables"
        );
        assert_eq!(
            report.ats_risks[1].display_line(GENERIC_RISK_TITLE),
            "Header graphics"
        );
        assert_eq!(
            report.ats_improvements[0].display_line(GENERIC_SUGGESTION_TITLE),
            "Add keywords: No explanation provided."
        );
        assert_eq!(report.summary_rewrite, "");
        assert!(report.detailed_suggestions.is_empty());
    }

    #[test]
    fn test_title_fallback_order() {
        let only_explanation = AtsItem::Detailed {
            risk: None,
            item: Some("  ".to_string()),
            suggestion: None,
            explanation: Some("Uses images".to_string()),
        };
        assert_eq!(only_explanation.title(GENERIC_RISK_TITLE), "Uses images");

        let empty = AtsItem::Detailed {
            risk: None,
            item: None,
            suggestion: None,
            explanation: None,
        };
        assert_eq!(empty.title(GENERIC_SUGGESTION_TITLE), "Generic Suggestion");
    }

    #[test]
    fn test_suggestion_is_not_a_title() {
        let item: AtsItem = serde_json::from_value(json!({
            "suggestion": "Use keywords",
            "explanation": "ATS match"
        }))
        .unwrap();
        assert_eq!(item.title(GENERIC_SUGGESTION_TITLE), "ATS match");
        assert_eq!(
            item.display_line(GENERIC_SUGGESTION_TITLE),
            "ATS match: ATS match"
        );

        let only_suggestion: AtsItem =
            serde_json::from_value(json!({"suggestion": "Use keywords"})).unwrap();
        assert_eq!(
            only_suggestion.title(GENERIC_SUGGESTION_TITLE),
            GENERIC_SUGGESTION_TITLE
        );
    }

    #[test]
    fn test_null_fields_fall_back_to_defaults() {
        let report: AnalysisReport = serde_json::from_value(json!({
            "overall_score": null,
            "score_reason": "Readable",
            "summary_rewrite": null,
            "key_skills": null,
            "ats_risks": null,
            "predicted_roles": [{"title": "Analyst", "explanation": null}],
            "detailed_suggestions": null
        }))
        .unwrap();

        assert_eq!(report.overall_score.to_string(), "N/A");
        assert_eq!(report.score_reason, "Readable");
        assert_eq!(report.summary_rewrite, "");
        assert!(report.key_skills.is_empty());
        assert!(report.ats_risks.is_empty());
        assert_eq!(report.predicted_roles[0], PredictedRole::new("Analyst", ""));
        assert!(report.detailed_suggestions.is_empty());
    }

    #[test]
    fn test_missing_score_defaults_to_na() {
        let report: AnalysisReport = serde_json::from_str("{}").unwrap();
        assert_eq!(report.overall_score.to_string(), "N/A");
        assert!(report.predicted_roles.is_empty());
    }

    #[test]
    fn test_failed_report_shape() {
        let report = AnalysisReport::failed("timeout");
        assert!(report.is_failure());
        assert_eq!(report.score_reason, "Analysis failed: timeout");

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["overall_score"], "Error");
        assert_eq!(value["key_skills"], json!(["N/A"]));
        assert_eq!(value["ats_risks"], json!(["N/A"]));
        assert_eq!(
            value["predicted_roles"],
            json!([{"title": "N/A", "explanation": "Error"}])
        );
    }

    #[test]
    fn test_fractional_score_display() {
        assert_eq!(Score::Value(82.5).to_string(), "82.5");
    }
}
