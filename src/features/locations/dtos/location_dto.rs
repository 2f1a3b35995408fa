use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::approvals::models::RecordStatus;
use crate::features::locations::models::{Location, LocationFilter, LocationType};
use crate::shared::types::{default_page, default_page_size, PaginationQuery};
use crate::shared::validation::{validate_kecamatan, validate_not_blank, CONTACT_REGEX};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateLocationDto {
    #[validate(
        length(min = 1, max = 200, message = "Nama lokasi 1-200 karakter"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    #[serde(rename = "type")]
    pub location_type: LocationType,

    #[validate(custom(function = "validate_kecamatan"))]
    pub kecamatan: String,

    #[validate(
        length(min = 1, max = 120, message = "Nama desa 1-120 karakter"),
        custom(function = "validate_not_blank")
    )]
    pub desa: String,

    #[validate(length(min = 1, max = 5000, message = "Deskripsi 1-5000 karakter"))]
    pub description: String,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude harus di antara -90 dan 90"))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude harus di antara -180 dan 180"))]
    pub longitude: f64,

    #[validate(length(max = 500))]
    pub address: Option<String>,

    #[validate(url(message = "URL gambar tidak valid"))]
    pub image_url: Option<String>,

    #[validate(regex(path = *CONTACT_REGEX, message = "Nomor kontak tidak valid"))]
    pub contact: Option<String>,
}

/// Staff edit; absent fields keep their current value
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateLocationDto {
    #[validate(
        length(min = 1, max = 200, message = "Nama lokasi 1-200 karakter"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub location_type: Option<LocationType>,

    #[validate(custom(function = "validate_kecamatan"))]
    pub kecamatan: Option<String>,

    #[validate(
        length(min = 1, max = 120, message = "Nama desa 1-120 karakter"),
        custom(function = "validate_not_blank")
    )]
    pub desa: Option<String>,

    #[validate(length(min = 1, max = 5000, message = "Deskripsi 1-5000 karakter"))]
    pub description: Option<String>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude harus di antara -90 dan 90"))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude harus di antara -180 dan 180"))]
    pub longitude: Option<f64>,

    #[validate(length(max = 500))]
    pub address: Option<String>,

    #[validate(url(message = "URL gambar tidak valid"))]
    pub image_url: Option<String>,

    #[validate(regex(path = *CONTACT_REGEX, message = "Nomor kontak tidak valid"))]
    pub contact: Option<String>,
}

/// Filters for location listings
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct LocationQueryParams {
    #[serde(rename = "type")]
    pub location_type: Option<LocationType>,
    pub kecamatan: Option<String>,
    pub desa: Option<String>,
    /// Matches name or description
    pub search: Option<String>,
    /// Staff listing only; ignored elsewhere
    pub status: Option<RecordStatus>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl LocationQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery::new(self.page, self.page_size)
    }

    pub fn filter(&self) -> LocationFilter {
        LocationFilter {
            status: None,
            created_by: None,
            location_type: self.location_type,
            kecamatan: self.kecamatan.clone(),
            desa: self.desa.clone(),
            search: self.search.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LocationResponseDto {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub location_type: LocationType,
    pub type_label: String,
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
    pub has_recommendation: bool,
    pub ai_generated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Location> for LocationResponseDto {
    fn from(l: Location) -> Self {
        Self {
            id: l.id,
            name: l.name,
            type_label: l.location_type.label().to_string(),
            location_type: l.location_type,
            kecamatan: l.kecamatan,
            desa: l.desa,
            description: l.description,
            latitude: l.latitude,
            longitude: l.longitude,
            address: l.address,
            image_url: l.image_url,
            contact: l.contact,
            status: l.status,
            created_by: l.created_by,
            approved_by: l.approved_by,
            approved_at: l.approved_at,
            rejection_reason: l.rejection_reason,
            has_recommendation: l.ai_recommendation.is_some(),
            ai_generated_at: l.ai_generated_at,
            created_at: l.created_at,
            updated_at: l.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{faker::lorem::en::Sentence, Fake};
    use serde_json::json;

    fn valid() -> CreateLocationDto {
        serde_json::from_value(json!({
            "name": "Pantai Klayar",
            "type": "wisata",
            "kecamatan": "Donorojo",
            "desa": "Sendang",
            "description": Sentence(3..8).fake::<String>(),
            "latitude": -8.2236,
            "longitude": 110.9526,
            "contact": "081234567890"
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_location() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_rejects_unknown_kecamatan() {
        let mut dto = valid();
        dto.kecamatan = "Wonogiri".to_string();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("kecamatan"));
    }

    #[test]
    fn test_rejects_out_of_range_coordinates() {
        let mut dto = valid();
        dto.latitude = -91.0;
        dto.longitude = 181.0;
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("latitude"));
        assert!(fields.contains_key("longitude"));
    }

    #[test]
    fn test_rejects_blank_name_and_bad_contact() {
        let mut dto = valid();
        dto.name = "   ".to_string();
        dto.contact = Some("hubungi saya".to_string());
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("contact"));
    }

    #[test]
    fn test_partial_update_validates_present_fields_only() {
        let dto: UpdateLocationDto =
            serde_json::from_value(json!({"description": "Akses jalan diperbaiki"})).unwrap();
        assert!(dto.validate().is_ok());

        let dto: UpdateLocationDto =
            serde_json::from_value(json!({"kecamatan": "Sleman"})).unwrap();
        assert!(dto.validate().is_err());
    }
}
