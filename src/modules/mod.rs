//! Modules layer - clients for external services (storage, identity, AI)

pub mod gemini;
pub mod logto;
pub mod storage;
