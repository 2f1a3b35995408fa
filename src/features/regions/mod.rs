//! Administrative regions of Kabupaten Pacitan.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/regions/kecamatan` | The 12 kecamatan with desa and location counts |
//! | GET | `/api/regions/kecamatan/{name}/desa` | Registered villages of a kecamatan |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::RegionService;
