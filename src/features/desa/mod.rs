//! Village (desa) profiles: statistics, tourism, BUMDes, flagship products,
//! infrastructure ratings and investment highlights.
//!
//! Reads are public; writes are staff-only. Names are unique per kecamatan.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::DesaService;
