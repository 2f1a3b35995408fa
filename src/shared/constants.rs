/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// REGION CONSTANTS
// =============================================================================

/// Regency every record belongs to
pub const KABUPATEN: &str = "Pacitan";

/// The 12 kecamatan (districts) of Kabupaten Pacitan
pub const KECAMATAN_PACITAN: [&str; 12] = [
    "Arjosari",
    "Bandar",
    "Donorojo",
    "Kebonagung",
    "Nawangan",
    "Ngadirojo",
    "Pacitan",
    "Pringkuku",
    "Punung",
    "Sudimoro",
    "Tegalombo",
    "Tulakan",
];

/// Case-insensitive lookup returning the canonical kecamatan spelling
pub fn canonical_kecamatan(name: &str) -> Option<&'static str> {
    let name = name.trim();
    KECAMATAN_PACITAN
        .iter()
        .copied()
        .find(|k| k.eq_ignore_ascii_case(name))
}

// =============================================================================
// UPLOAD CONSTANTS
// =============================================================================

/// Maximum size of an uploaded image
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024; // 5MB

/// Accepted image content types with their file extensions
pub const ALLOWED_IMAGE_TYPES: [(&str, &str); 4] = [
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
    ("image/gif", "gif"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_kecamatan() {
        assert_eq!(canonical_kecamatan("pacitan"), Some("Pacitan"));
        assert_eq!(canonical_kecamatan("  TULAKAN "), Some("Tulakan"));
        assert_eq!(canonical_kecamatan("Ngawi"), None);
        assert_eq!(canonical_kecamatan(""), None);
    }
}
