use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::regions::models::{DesaName, KecamatanSummary};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct KecamatanResponseDto {
    pub name: String,
    /// Registered village profiles
    pub desa_count: i64,
    /// Approved locations
    pub location_count: i64,
}

impl From<KecamatanSummary> for KecamatanResponseDto {
    fn from(k: KecamatanSummary) -> Self {
        Self {
            name: k.name.to_string(),
            desa_count: k.desa_count,
            location_count: k.location_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DesaNameDto {
    pub id: Uuid,
    pub name: String,
}

impl From<DesaName> for DesaNameDto {
    fn from(d: DesaName) -> Self {
        Self {
            id: d.id,
            name: d.name,
        }
    }
}
