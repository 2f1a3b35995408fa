use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

use crate::shared::constants::canonical_kecamatan;

lazy_static! {
    /// Regex for validating username fields
    /// Lowercase letters, digits and underscores, 3-30 chars, starting with a letter
    /// - Valid: "budi_santoso", "warga123", "pokdarwis_ngiliyep"
    /// - Invalid: "123warga", "_admin", "Budi", "budi-santoso", "ab"
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-z][a-z0-9_]{2,29}$").unwrap();

    /// Regex for validating phone/WhatsApp contacts
    /// - Valid: "081234567890", "+6281234567890", "(0357) 881234"
    pub static ref CONTACT_REGEX: Regex = Regex::new(r"^\+?[0-9()\- ]{6,20}$").unwrap();
}

/// Validates that a kecamatan belongs to Kabupaten Pacitan
pub fn validate_kecamatan(value: &str) -> Result<(), ValidationError> {
    if canonical_kecamatan(value).is_some() {
        Ok(())
    } else {
        let mut err = ValidationError::new("kecamatan");
        err.message = Some(format!("'{}' bukan kecamatan di Kabupaten Pacitan", value).into());
        Err(err)
    }
}

/// Rejects strings that are empty once trimmed
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_regex_valid() {
        assert!(USERNAME_REGEX.is_match("budi_santoso"));
        assert!(USERNAME_REGEX.is_match("warga123"));
        assert!(USERNAME_REGEX.is_match("abc"));
    }

    #[test]
    fn test_username_regex_invalid() {
        assert!(!USERNAME_REGEX.is_match("123warga")); // starts with digit
        assert!(!USERNAME_REGEX.is_match("_admin")); // starts with underscore
        assert!(!USERNAME_REGEX.is_match("Budi")); // uppercase
        assert!(!USERNAME_REGEX.is_match("budi-santoso")); // hyphen
        assert!(!USERNAME_REGEX.is_match("ab")); // too short
        assert!(!USERNAME_REGEX.is_match(&"a".repeat(31))); // too long
    }

    #[test]
    fn test_contact_regex() {
        assert!(CONTACT_REGEX.is_match("081234567890"));
        assert!(CONTACT_REGEX.is_match("+6281234567890"));
        assert!(CONTACT_REGEX.is_match("(0357) 881234"));
        assert!(!CONTACT_REGEX.is_match("hubungi saya"));
    }

    #[test]
    fn test_validate_kecamatan() {
        assert!(validate_kecamatan("Punung").is_ok());
        assert!(validate_kecamatan("donorojo").is_ok());
        assert!(validate_kecamatan("Wonogiri").is_err());
    }

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("  ").is_err());
        assert!(validate_not_blank(" ok ").is_ok());
    }
}
