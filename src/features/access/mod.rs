pub mod policy;
pub mod role;

pub use policy::{can_perform, check_user_management, Action, PolicyViolation, UserManagementOp, UserRef};
pub use role::UserRole;
