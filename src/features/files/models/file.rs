use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Stored image metadata
#[derive(Debug, FromRow)]
pub struct StoredFile {
    pub id: Uuid,
    pub file_key: String,
    pub original_filename: String,
    pub content_type: String,
    pub file_size: i64,
    pub url: String,
    pub purpose: String,
    pub uploaded_by: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What an image is attached to; also the second segment of its object key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImagePurpose {
    Location,
    Investment,
    Desa,
    #[default]
    General,
}

impl ImagePurpose {
    pub fn as_str(self) -> &'static str {
        match self {
            ImagePurpose::Location => "location",
            ImagePurpose::Investment => "investment",
            ImagePurpose::Desa => "desa",
            ImagePurpose::General => "general",
        }
    }

    /// Unknown or empty values fall back to `general`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "location" => ImagePurpose::Location,
            "investment" => ImagePurpose::Investment,
            "desa" => ImagePurpose::Desa,
            _ => ImagePurpose::General,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purpose_parse() {
        assert_eq!(ImagePurpose::parse(" Desa "), ImagePurpose::Desa);
        assert_eq!(ImagePurpose::parse("avatar"), ImagePurpose::General);
        assert_eq!(ImagePurpose::parse(""), ImagePurpose::General);
    }
}
