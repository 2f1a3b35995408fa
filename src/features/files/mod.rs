//! Image uploads to the object store.
//!
//! | Method | Endpoint | Auth |
//! |--------|----------|------|
//! | POST | `/api/files/upload` | Profile |
//! | DELETE | `/api/files` | Uploader or staff |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::FileService;
