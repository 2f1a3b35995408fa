mod user_service;

pub use user_service::{check_delete_request, UserService};
