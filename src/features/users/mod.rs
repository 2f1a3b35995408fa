//! Profiles and owner account administration.
//!
//! | Method | Endpoint | Auth |
//! |--------|----------|------|
//! | GET | `/api/usernames/{username}/availability` | No |
//! | POST | `/api/users/profile` | Token |
//! | GET | `/api/users/me` | Profile |
//! | GET | `/api/admin/users` | Owner |
//! | PATCH | `/api/admin/users/{id}/role` | Owner |
//! | POST | `/api/admin/delete-user` | Owner |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::UserService;
