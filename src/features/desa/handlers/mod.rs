mod desa_handler;

pub use desa_handler::*;
