use std::sync::Arc;

use crate::features::recommendations::models::{AiRecommendation, AnalysisRequest};
use crate::modules::gemini::TextGenerator;
use crate::shared::llm::{parse_with_fallback, LlmResponse};
use crate::shared::prompts::{
    render_investment_recommendation, render_location_analysis, TemplateError,
};

/// Prompt rendering, model call and output parsing for recommendations.
///
/// `narrate` never fails: any problem along the way yields
/// [`AiRecommendation`]'s fallback with the reason recorded in `error`.
pub struct RecommendationEngine {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl RecommendationEngine {
    /// `None` means no model is configured and every narration falls back
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        if generator.is_none() {
            tracing::warn!("No text generator configured, recommendations will use the fallback");
        }
        Self { generator }
    }

    pub fn render_prompt(request: &AnalysisRequest) -> Result<String, TemplateError> {
        let schema = AiRecommendation::json_schema_string();
        match request {
            AnalysisRequest::Location { item, type_label } => {
                render_location_analysis(item, type_label, &schema)
            }
            AnalysisRequest::Desa { item } => render_investment_recommendation(item, &schema),
        }
    }

    pub async fn narrate(&self, request: &AnalysisRequest) -> AiRecommendation {
        let prompt = match Self::render_prompt(request) {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::warn!("Failed to render recommendation prompt: {}", e);
                return AiRecommendation::fallback(e.to_string());
            }
        };

        let Some(generator) = &self.generator else {
            return AiRecommendation::fallback("Layanan AI belum dikonfigurasi");
        };

        match generator.generate(&prompt).await {
            Ok(text) => {
                let parsed = parse_with_fallback::<AiRecommendation>(&text);
                if parsed.is_success() {
                    tracing::debug!("Recommendation generated by {}", generator.model_name());
                    parsed.normalized()
                } else {
                    parsed
                }
            }
            Err(e) => {
                tracing::warn!("{} failed, using fallback: {}", generator.model_name(), e);
                AiRecommendation::fallback(e.to_string())
            }
        }
    }
}
