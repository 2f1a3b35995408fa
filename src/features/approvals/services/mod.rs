mod approval_service;

pub use approval_service::ApprovalService;
