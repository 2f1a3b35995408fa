mod jwks;
mod resolver;
mod validator;

pub mod guards;
pub mod model;

pub use jwks::JwksClient;
pub use resolver::AccountResolver;
pub use validator::{JwtValidator, VerifiedToken};
