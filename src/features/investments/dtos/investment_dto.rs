use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::approvals::models::RecordStatus;
use crate::features::investments::models::{Investment, InvestmentFilter, InvestmentSector};
use crate::shared::types::{default_page, default_page_size, PaginationQuery};
use crate::shared::validation::{validate_kecamatan, validate_not_blank, CONTACT_REGEX};

fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("Nilai investasi tidak boleh negatif".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateInvestmentDto {
    #[validate(
        length(min = 1, max = 200, message = "Judul 1-200 karakter"),
        custom(function = "validate_not_blank")
    )]
    pub title: String,

    pub sector: InvestmentSector,

    #[validate(custom(function = "validate_kecamatan"))]
    pub kecamatan: String,

    #[validate(
        length(min = 1, max = 120, message = "Nama desa 1-120 karakter"),
        custom(function = "validate_not_blank")
    )]
    pub desa: String,

    #[validate(length(min = 1, max = 5000, message = "Deskripsi 1-5000 karakter"))]
    pub description: String,

    /// Estimated value in rupiah
    #[validate(custom(function = "validate_non_negative"))]
    #[schema(value_type = String, example = "1500000000")]
    pub estimated_value: Decimal,

    /// Related location, if any
    pub location_id: Option<Uuid>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude harus di antara -90 dan 90"))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude harus di antara -180 dan 180"))]
    pub longitude: Option<f64>,

    #[validate(regex(path = *CONTACT_REGEX, message = "Nomor kontak tidak valid"))]
    pub contact: Option<String>,

    #[validate(url(message = "URL gambar tidak valid"))]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateInvestmentDto {
    #[validate(
        length(min = 1, max = 200, message = "Judul 1-200 karakter"),
        custom(function = "validate_not_blank")
    )]
    pub title: Option<String>,

    pub sector: Option<InvestmentSector>,

    #[validate(custom(function = "validate_kecamatan"))]
    pub kecamatan: Option<String>,

    #[validate(
        length(min = 1, max = 120, message = "Nama desa 1-120 karakter"),
        custom(function = "validate_not_blank")
    )]
    pub desa: Option<String>,

    #[validate(length(min = 1, max = 5000, message = "Deskripsi 1-5000 karakter"))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_non_negative"))]
    #[schema(value_type = Option<String>)]
    pub estimated_value: Option<Decimal>,

    pub location_id: Option<Uuid>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude harus di antara -90 dan 90"))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude harus di antara -180 dan 180"))]
    pub longitude: Option<f64>,

    #[validate(regex(path = *CONTACT_REGEX, message = "Nomor kontak tidak valid"))]
    pub contact: Option<String>,

    #[validate(url(message = "URL gambar tidak valid"))]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct InvestmentQueryParams {
    pub sector: Option<InvestmentSector>,
    pub kecamatan: Option<String>,
    pub desa: Option<String>,
    /// Matches title or description
    pub search: Option<String>,
    /// Staff listing and own submissions only
    pub status: Option<RecordStatus>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl InvestmentQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery::new(self.page, self.page_size)
    }

    pub fn filter(&self) -> InvestmentFilter {
        InvestmentFilter {
            status: None,
            created_by: None,
            sector: self.sector,
            kecamatan: self.kecamatan.clone(),
            desa: self.desa.clone(),
            search: self.search.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InvestmentResponseDto {
    pub id: Uuid,
    pub title: String,
    pub sector: InvestmentSector,
    pub sector_label: String,
    pub kecamatan: String,
    pub desa: String,
    pub description: String,
    #[schema(value_type = String)]
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

impl From<Investment> for InvestmentResponseDto {
    fn from(i: Investment) -> Self {
        Self {
            id: i.id,
            title: i.title,
            sector_label: i.sector.label().to_string(),
            sector: i.sector,
            kecamatan: i.kecamatan,
            desa: i.desa,
            description: i.description,
            estimated_value: i.estimated_value,
            location_id: i.location_id,
            latitude: i.latitude,
            longitude: i.longitude,
            contact: i.contact,
            image_url: i.image_url,
            status: i.status,
            created_by: i.created_by,
            approved_by: i.approved_by,
            approved_at: i.approved_at,
            rejection_reason: i.rejection_reason,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dto(value: serde_json::Value) -> CreateInvestmentDto {
        let mut base = json!({
            "title": "Homestay Pantai Srau",
            "sector": "pariwisata",
            "kecamatan": "Pringkuku",
            "desa": "Candi",
            "description": "Pengembangan 10 unit homestay",
            "estimated_value": "750000000"
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), value.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(base).unwrap()
    }

    #[test]
    fn test_valid_investment() {
        let d = dto(json!({}));
        assert!(d.validate().is_ok());
        assert_eq!(d.estimated_value, Decimal::new(750_000_000, 0));
    }

    #[test]
    fn test_zero_value_allowed_negative_refused() {
        assert!(dto(json!({"estimated_value": 0})).validate().is_ok());
        let errors = dto(json!({"estimated_value": "-1"})).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("estimated_value"));
    }

    #[test]
    fn test_optional_coordinates_are_range_checked() {
        assert!(dto(json!({"latitude": -8.2, "longitude": 111.1}))
            .validate()
            .is_ok());
        assert!(dto(json!({"latitude": 95.0})).validate().is_err());
    }

    #[test]
    fn test_sector_wire_names() {
        let d = dto(json!({"sector": "energi"}));
        assert_eq!(d.sector, InvestmentSector::Energi);
        assert!(serde_json::from_value::<CreateInvestmentDto>(json!({
            "title": "x", "sector": "tambang", "kecamatan": "Pacitan",
            "desa": "Sirnoboyo", "description": "x", "estimated_value": 1
        }))
        .is_err());
    }
}
