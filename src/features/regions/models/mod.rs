mod kecamatan;

pub use kecamatan::{summarize, DesaName, KecamatanSummary};
