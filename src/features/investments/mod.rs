//! Investment opportunities, reviewed through the same queue as locations.
//!
//! Public listings only ever show `approved` records.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::InvestmentService;
