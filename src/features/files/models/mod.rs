mod file;

pub use file::{ImagePurpose, StoredFile};
