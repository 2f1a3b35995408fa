use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Headline figures of a village
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct DesaStatistics {
    #[validate(range(min = 0))]
    pub population: i64,
    #[validate(range(min = 0))]
    pub households: i64,
    #[validate(range(min = 0.0))]
    pub area_km2: f64,
    #[validate(range(min = 0))]
    pub hamlets: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct TourismItem {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Village-owned enterprise (Badan Usaha Milik Desa)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Bumdes {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1945, max = 2100))]
    pub established_year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductItem {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Infrastructure quality on a 1-5 scale; unrated aspects are omitted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct InfrastructureRatings {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 5))]
    pub roads: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 5))]
    pub clean_water: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 5))]
    pub electricity: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 5))]
    pub internet: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 5))]
    pub health: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 5))]
    pub education: Option<u8>,
}

impl InfrastructureRatings {
    fn ratings(&self) -> [Option<u8>; 6] {
        [
            self.roads,
            self.clean_water,
            self.electricity,
            self.internet,
            self.health,
            self.education,
        ]
    }

    /// Mean of the rated aspects, `None` when nothing is rated
    pub fn average(&self) -> Option<f64> {
        let rated: Vec<f64> = self.ratings().iter().flatten().map(|&r| r as f64).collect();
        if rated.is_empty() {
            return None;
        }
        Some(rated.iter().sum::<f64>() / rated.len() as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct InvestmentBlurb {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Village profile
#[derive(Debug, Clone, FromRow)]
pub struct Desa {
    pub id: Uuid,
    pub name: String,
    pub kecamatan: String,
    pub head_name: Option<String>,
    pub description: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_url: Option<String>,
    pub statistics: Json<DesaStatistics>,
    pub tourism: Json<Vec<TourismItem>>,
    pub bumdes: Json<Vec<Bumdes>>,
    pub products: Json<Vec<ProductItem>>,
    pub infrastructure: Json<InfrastructureRatings>,
    pub investment_highlights: Json<Vec<InvestmentBlurb>>,
    pub ai_recommendation: Option<serde_json::Value>,
    pub ai_generated_at: Option<DateTime<Utc>>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_infrastructure_average() {
        assert_eq!(InfrastructureRatings::default().average(), None);

        let ratings = InfrastructureRatings {
            roads: Some(2),
            electricity: Some(5),
            internet: Some(2),
            ..Default::default()
        };
        assert_eq!(ratings.average(), Some(3.0));
    }

    #[test]
    fn test_ratings_out_of_scale() {
        let ratings: InfrastructureRatings =
            serde_json::from_value(json!({"roads": 6, "health": 0})).unwrap();
        let errors = ratings.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("roads"));
        assert!(errors.field_errors().contains_key("health"));
    }

    #[test]
    fn test_empty_json_columns_decode_to_defaults() {
        let stats: DesaStatistics = serde_json::from_value(json!({})).unwrap();
        assert_eq!(stats, DesaStatistics::default());
        let infra: InfrastructureRatings = serde_json::from_value(json!({})).unwrap();
        assert_eq!(serde_json::to_value(&infra).unwrap(), json!({}));
    }
}
