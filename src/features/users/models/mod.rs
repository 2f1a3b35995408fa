mod user;

pub use user::{claims_owner_seat, normalize_username, User, UsernameIssue};
