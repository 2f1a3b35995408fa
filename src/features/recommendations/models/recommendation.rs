use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::llm::LlmResponse;

fn default_true() -> bool {
    true
}

/// Feasibility narrative produced by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct AiRecommendation {
    /// 0 (not feasible) to 100 (highly feasible)
    pub feasibility_score: f64,

    /// Two to four sentences in Bahasa Indonesia
    pub summary: String,

    #[serde(default)]
    pub suggestions: Vec<String>,

    #[serde(default)]
    pub risks: Vec<String>,

    #[serde(default = "default_true")]
    #[schemars(skip)]
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(skip)]
    pub error: Option<String>,
}

/// The canned answer served whenever narration fails
impl Default for AiRecommendation {
    fn default() -> Self {
        Self {
            feasibility_score: 0.0,
            summary: "Rekomendasi AI belum dapat dibuat saat ini. Silakan coba lagi nanti."
                .to_string(),
            suggestions: vec![
                "Lengkapi deskripsi dan data pendukung agar analisis lebih akurat".to_string(),
                "Konsultasikan potensi ini dengan perangkat desa dan dinas terkait".to_string(),
            ],
            risks: vec!["Analisis otomatis tidak tersedia".to_string()],
            success: false,
            error: None,
        }
    }
}

impl LlmResponse for AiRecommendation {
    fn mark_as_fallback(&mut self, reason: String) {
        *self = Self {
            error: Some(reason),
            ..Self::default()
        };
    }

    fn is_success(&self) -> bool {
        self.success
    }
}

impl AiRecommendation {
    /// Clamp the score into 0..=100 and drop blank list entries.
    /// A reply without a summary is unusable and becomes the fallback.
    pub fn normalized(mut self) -> Self {
        if self.summary.trim().is_empty() {
            return Self::fallback("Model returned an empty summary");
        }
        self.feasibility_score = if self.feasibility_score.is_finite() {
            self.feasibility_score.clamp(0.0, 100.0).round()
        } else {
            0.0
        };
        self.summary = self.summary.trim().to_string();
        for list in [&mut self.suggestions, &mut self.risks] {
            list.retain(|s| !s.trim().is_empty());
        }
        self
    }
}

/// Entity a recommendation is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationTarget {
    Location,
    Desa,
}

impl RecommendationTarget {
    pub fn table(self) -> &'static str {
        match self {
            RecommendationTarget::Location => "locations",
            RecommendationTarget::Desa => "desa",
        }
    }
}

/// Prompt input for one narration
#[derive(Debug, Clone)]
pub enum AnalysisRequest {
    /// `location_analysis` prompt
    Location {
        item: serde_json::Value,
        type_label: String,
    },
    /// `investment_recommendation` prompt
    Desa { item: serde_json::Value },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fallback_shape() {
        let fallback = AiRecommendation::fallback("Gemini quota exhausted");
        assert!(!fallback.is_success());
        assert_eq!(fallback.error.as_deref(), Some("Gemini quota exhausted"));
        assert_eq!(fallback.feasibility_score, 0.0);
        assert!(!fallback.suggestions.is_empty());
        assert_eq!(
            AiRecommendation::fallback("lain").summary,
            fallback.summary,
            "fallback text is deterministic"
        );
    }

    #[test]
    fn test_model_output_defaults_to_success() {
        let parsed: AiRecommendation = serde_json::from_value(json!({
            "feasibility_score": 78,
            "summary": "Layak dikembangkan.",
            "suggestions": ["Bangun gazebo"],
            "risks": ["Abrasi"]
        }))
        .unwrap();
        assert!(parsed.is_success());
        assert!(parsed.error.is_none());
    }

    #[test]
    fn test_normalized_clamps_score() {
        let rec = AiRecommendation {
            feasibility_score: 140.4,
            summary: "  Bagus  ".to_string(),
            suggestions: vec!["".to_string(), "Promosi digital".to_string()],
            risks: vec![" ".to_string()],
            success: true,
            error: None,
        }
        .normalized();
        assert_eq!(rec.feasibility_score, 100.0);
        assert_eq!(rec.summary, "Bagus");
        assert_eq!(rec.suggestions, vec!["Promosi digital".to_string()]);
        assert!(rec.risks.is_empty());

        let rec = AiRecommendation {
            feasibility_score: -3.0,
            ..AiRecommendation::default()
        }
        .normalized();
        assert_eq!(rec.feasibility_score, 0.0);
    }

    #[test]
    fn test_reply_without_required_fields_is_rejected() {
        assert!(serde_json::from_value::<AiRecommendation>(json!({})).is_err());
        assert!(serde_json::from_value::<AiRecommendation>(json!({"note": "maaf"})).is_err());
    }

    #[test]
    fn test_blank_summary_normalizes_to_fallback() {
        let rec = AiRecommendation {
            feasibility_score: 55.0,
            summary: "   ".to_string(),
            suggestions: vec!["Promosi".to_string()],
            risks: vec![],
            success: true,
            error: None,
        }
        .normalized();
        assert!(!rec.is_success());
        assert_eq!(rec.summary, AiRecommendation::default().summary);
        assert!(rec.error.is_some());
    }

    #[test]
    fn test_schema_hides_internal_markers() {
        let schema = AiRecommendation::json_schema_string();
        assert!(schema.contains("feasibility_score"));
        assert!(!schema.contains("\"success\""));
        assert!(!schema.contains("\"error\""));
    }

    #[test]
    fn test_target_from_path_segment() {
        let target: RecommendationTarget = serde_json::from_str("\"desa\"").unwrap();
        assert_eq!(target.table(), "desa");
    }
}
