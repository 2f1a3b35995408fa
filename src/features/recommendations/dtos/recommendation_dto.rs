use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::recommendations::models::{AiRecommendation, RecommendationTarget};

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct GenerateRecommendationQuery {
    /// Ignore the cache and ask the model again (staff only)
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecommendationResponseDto {
    pub target: RecommendationTarget,
    pub target_id: Uuid,
    pub recommendation: AiRecommendation,
    /// When the stored recommendation was produced; `None` for fallbacks
    pub generated_at: Option<DateTime<Utc>>,
    /// Served from the cache without calling the model
    pub cached: bool,
    /// Canned answer returned because narration failed; not stored
    pub is_fallback: bool,
}

impl RecommendationResponseDto {
    pub fn new(
        target: RecommendationTarget,
        target_id: Uuid,
        recommendation: AiRecommendation,
        generated_at: Option<DateTime<Utc>>,
        cached: bool,
    ) -> Self {
        Self {
            target,
            target_id,
            is_fallback: !recommendation.success,
            recommendation,
            generated_at,
            cached,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::llm::LlmResponse;

    #[test]
    fn test_force_defaults_to_false() {
        let query: GenerateRecommendationQuery = serde_json::from_str("{}").unwrap();
        assert!(!query.force);
    }

    #[test]
    fn test_fallback_flag_follows_recommendation() {
        let dto = RecommendationResponseDto::new(
            RecommendationTarget::Desa,
            Uuid::new_v4(),
            AiRecommendation::fallback("Layanan AI belum dikonfigurasi"),
            None,
            false,
        );
        assert!(dto.is_fallback);

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["target"], "desa");
        assert_eq!(json["recommendation"]["success"], false);
        assert_eq!(
            json["recommendation"]["error"],
            "Layanan AI belum dikonfigurasi"
        );
    }
}
