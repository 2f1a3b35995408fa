//! Potential sites (wisata, pertanian, perikanan, UMKM, infrastruktur, aset desa).
//!
//! | Method | Endpoint | Auth |
//! |--------|----------|------|
//! | GET | `/api/locations` | No |
//! | GET | `/api/locations/{id}` | No |
//! | POST | `/api/locations` | Profile |
//! | GET | `/api/locations/mine` | Profile |
//! | GET | `/api/admin/locations` | Staff |
//! | PUT/DELETE | `/api/admin/locations/{id}` | Staff |
//! | POST | `/api/admin/locations/{id}/approve` | Staff |
//! | POST | `/api/admin/locations/{id}/reject` | Staff |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::LocationService;
