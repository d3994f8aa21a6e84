pub mod auth;

pub use auth::{CredentialVerifier, TokenIssuer};
