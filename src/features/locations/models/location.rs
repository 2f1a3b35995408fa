use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::approvals::models::RecordStatus;

/// Category of a potential site
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "location_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Wisata,
    Pertanian,
    Perikanan,
    Umkm,
    Infrastruktur,
    AsetDesa,
}

impl LocationType {
    /// Human-readable label used in prompts
    pub fn label(self) -> &'static str {
        match self {
            LocationType::Wisata => "Wisata",
            LocationType::Pertanian => "Pertanian",
            LocationType::Perikanan => "Perikanan",
            LocationType::Umkm => "UMKM",
            LocationType::Infrastruktur => "Infrastruktur",
            LocationType::AsetDesa => "Aset Desa",
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub location_type: LocationType,
    pub kecamatan: String,
    pub desa: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub image_url: Option<String>,
    pub contact: Option<String>,
    pub status: RecordStatus,
    pub created_by: Uuid,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub ai_recommendation: Option<serde_json::Value>,
    pub ai_generated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Search criteria shared by the public, own and staff listings
#[derive(Debug, Clone, Default)]
pub struct LocationFilter {
    pub status: Option<RecordStatus>,
    pub created_by: Option<Uuid>,
    pub location_type: Option<LocationType>,
    pub kecamatan: Option<String>,
    pub desa: Option<String>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_type_wire_names() {
        assert_eq!(
            serde_json::to_value(LocationType::AsetDesa).unwrap(),
            serde_json::json!("aset_desa")
        );
        let parsed: LocationType = serde_json::from_str("\"umkm\"").unwrap();
        assert_eq!(parsed, LocationType::Umkm);
        assert_eq!(parsed.label(), "UMKM");
    }
}
