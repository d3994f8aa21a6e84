use serde::{Deserialize, Serialize};

/// Verified bearer-token claims.
///
/// Produced by the credential verifier and handed explicitly to every service
/// that needs the caller's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account e-mail.
    pub sub: String,
    /// Always issued, but tokens carrying only `sub` and `exp` are valid too.
    #[serde(default)]
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(subject: impl Into<String>, issued_at: i64, ttl_seconds: i64) -> Self {
        Self {
            sub: subject.into(),
            iat: issued_at,
            exp: issued_at + ttl_seconds,
        }
    }

    pub fn subject(&self) -> &str {
        &self.sub
    }
}
