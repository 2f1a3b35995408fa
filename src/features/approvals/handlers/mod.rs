mod approval_handler;

pub use approval_handler::*;
