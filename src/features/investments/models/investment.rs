use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::approvals::models::RecordStatus;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "investment_sector", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InvestmentSector {
    Pariwisata,
    Pertanian,
    Perikanan,
    Umkm,
    Infrastruktur,
    Energi,
    Lainnya,
}

impl InvestmentSector {
    pub fn label(self) -> &'static str {
        match self {
            InvestmentSector::Pariwisata => "Pariwisata",
            InvestmentSector::Pertanian => "Pertanian",
            InvestmentSector::Perikanan => "Perikanan",
            InvestmentSector::Umkm => "UMKM",
            InvestmentSector::Infrastruktur => "Infrastruktur",
            InvestmentSector::Energi => "Energi",
            InvestmentSector::Lainnya => "Lainnya",
        }
    }
}

/// Investment opportunity offered to prospective investors
#[derive(Debug, Clone, FromRow)]
pub struct Investment {
    pub id: Uuid,
    pub title: String,
    pub sector: InvestmentSector,
    pub kecamatan: String,
    pub desa: String,
    pub description: String,
    /// Rupiah
    pub estimated_value: Decimal,
    pub location_id: Option<Uuid>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub contact: Option<String>,
    pub image_url: Option<String>,
    pub status: RecordStatus,
    pub created_by: Uuid,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct InvestmentFilter {
    pub status: Option<RecordStatus>,
    pub created_by: Option<Uuid>,
    pub sector: Option<InvestmentSector>,
    pub kecamatan: Option<String>,
    pub desa: Option<String>,
    pub search: Option<String>,
}
