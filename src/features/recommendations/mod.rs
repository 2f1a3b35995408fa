//! AI feasibility recommendations, cached on the location or desa row.
//!
//! | Method | Endpoint | Auth |
//! |--------|----------|------|
//! | GET | `/api/recommendations/{target}/{id}` | No |
//! | POST | `/api/recommendations/{target}/{id}?force=` | Profile (`force`: staff) |
//! | DELETE | `/api/recommendations/{target}/{id}` | Staff |
//!
//! `target` is `location` or `desa`.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{RecommendationEngine, RecommendationService};
