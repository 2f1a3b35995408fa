use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::desa::models::{
    Bumdes, Desa, DesaStatistics, InfrastructureRatings, InvestmentBlurb, ProductItem,
    TourismItem,
};
use crate::shared::types::{default_page, default_page_size, PaginationQuery};
use crate::shared::validation::{validate_kecamatan, validate_not_blank};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateDesaDto {
    #[validate(
        length(min = 1, max = 120, message = "Nama desa 1-120 karakter"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    #[validate(custom(function = "validate_kecamatan"))]
    pub kecamatan: String,

    /// Kepala desa
    #[validate(length(max = 120))]
    pub head_name: Option<String>,

    #[serde(default)]
    #[validate(length(max = 10000))]
    pub description: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,

    #[validate(url(message = "URL gambar tidak valid"))]
    pub image_url: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub statistics: DesaStatistics,

    #[serde(default)]
    #[validate(length(max = 50), nested)]
    pub tourism: Vec<TourismItem>,

    #[serde(default)]
    #[validate(length(max = 20), nested)]
    pub bumdes: Vec<Bumdes>,

    #[serde(default)]
    #[validate(length(max = 50), nested)]
    pub products: Vec<ProductItem>,

    #[serde(default)]
    #[validate(nested)]
    pub infrastructure: InfrastructureRatings,

    #[serde(default)]
    #[validate(length(max = 20), nested)]
    pub investment_highlights: Vec<InvestmentBlurb>,
}

/// Absent fields keep their current value; list fields replace the whole list
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateDesaDto {
    #[validate(
        length(min = 1, max = 120, message = "Nama desa 1-120 karakter"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,

    #[validate(custom(function = "validate_kecamatan"))]
    pub kecamatan: Option<String>,

    #[validate(length(max = 120))]
    pub head_name: Option<String>,

    #[validate(length(max = 10000))]
    pub description: Option<String>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,

    #[validate(url(message = "URL gambar tidak valid"))]
    pub image_url: Option<String>,

    #[validate(nested)]
    pub statistics: Option<DesaStatistics>,

    #[validate(length(max = 50), nested)]
    pub tourism: Option<Vec<TourismItem>>,

    #[validate(length(max = 20), nested)]
    pub bumdes: Option<Vec<Bumdes>>,

    #[validate(length(max = 50), nested)]
    pub products: Option<Vec<ProductItem>>,

    #[validate(nested)]
    pub infrastructure: Option<InfrastructureRatings>,

    #[validate(length(max = 20), nested)]
    pub investment_highlights: Option<Vec<InvestmentBlurb>>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct DesaQueryParams {
    pub kecamatan: Option<String>,
    /// Matches the village name
    pub search: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl DesaQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery::new(self.page, self.page_size)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DesaResponseDto {
    pub id: Uuid,
    pub name: String,
    pub kecamatan: String,
    pub head_name: Option<String>,
    pub description: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_url: Option<String>,
    pub statistics: DesaStatistics,
    pub tourism: Vec<TourismItem>,
    pub bumdes: Vec<Bumdes>,
    pub products: Vec<ProductItem>,
    pub infrastructure: InfrastructureRatings,
    /// Mean of the rated infrastructure aspects
    pub infrastructure_score: Option<f64>,
    pub investment_highlights: Vec<InvestmentBlurb>,
    pub has_recommendation: bool,
    pub ai_generated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Desa> for DesaResponseDto {
    fn from(d: Desa) -> Self {
        Self {
            id: d.id,
            name: d.name,
            kecamatan: d.kecamatan,
            head_name: d.head_name,
            description: d.description,
            latitude: d.latitude,
            longitude: d.longitude,
            image_url: d.image_url,
            statistics: d.statistics.0,
            tourism: d.tourism.0,
            bumdes: d.bumdes.0,
            products: d.products.0,
            infrastructure_score: d.infrastructure.average(),
            infrastructure: d.infrastructure.0,
            investment_highlights: d.investment_highlights.0,
            has_recommendation: d.ai_recommendation.is_some(),
            ai_generated_at: d.ai_generated_at,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}
