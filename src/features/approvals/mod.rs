//! Review queue for user submissions.
//!
//! Locations and investments created by regular users start `pending` and
//! get a queue entry; staff approve or reject them either through the queue
//! (`/api/approvals/{id}/...`) or directly on the record
//! (`/api/admin/{locations|investments}/{id}/...`). Both paths share
//! [`ApprovalService::review_target`].
//!
//! | Method | Endpoint | Auth |
//! |--------|----------|------|
//! | GET | `/api/approvals` | Staff |
//! | GET | `/api/approvals/stats` | Staff |
//! | POST | `/api/approvals/{id}/approve` | Staff |
//! | POST | `/api/approvals/{id}/reject` | Staff |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ApprovalService;
