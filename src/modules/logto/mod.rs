//! Logto Management API access (machine-to-machine).

mod management_client;
mod token_manager;

pub use management_client::{IdentityProvider, LogtoManagementClient};
pub use token_manager::LogtoTokenManager;
