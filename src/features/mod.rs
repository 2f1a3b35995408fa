pub mod access;
pub mod approvals;
pub mod auth;
pub mod desa;
pub mod files;
pub mod investments;
pub mod locations;
pub mod recommendations;
pub mod regions;
pub mod users;
