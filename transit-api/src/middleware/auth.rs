use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use transit_core::{Claims, CoreError};

use crate::{error::AppError, state::AppState};

// ============================================================================
// Token Issuer
// ============================================================================

/// Signs HS256 bearer tokens whose subject is the account e-mail.
#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            key: EncodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn issue(&self, subject: &str) -> Result<String, CoreError> {
        self.issue_at(subject, Utc::now())
    }

    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<String, CoreError> {
        let claims = Claims::new(subject, now.timestamp(), self.ttl.num_seconds());

        encode(&Header::new(Algorithm::HS256), &claims, &self.key)
            .map_err(|e| CoreError::Internal(format!("Token encoding failed: {}", e)))
    }
}

// ============================================================================
// Credential Verifier
// ============================================================================

/// Validates bearer tokens issued by [`TokenIssuer`] with the same secret.
///
/// Malformed tokens are a client error (`BadRequest`); a bad signature or an
/// expired token is `Unauthenticated`.
#[derive(Clone)]
pub struct CredentialVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl CredentialVerifier {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn verify(&self, token: Option<&str>) -> Result<Claims, CoreError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CoreError::Unauthenticated("Missing authorization header".to_string()))?;

        let token = token.strip_prefix("Bearer ").unwrap_or(token);

        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                tracing::warn!("Rejected token with invalid signature");
                CoreError::Unauthenticated("Invalid token signature".to_string())
            }
            ErrorKind::ExpiredSignature | ErrorKind::ImmatureSignature => {
                CoreError::Unauthenticated("Token expired".to_string())
            }
            _ => {
                tracing::debug!("Rejected malformed token: {}", e);
                CoreError::BadRequest("Invalid token".to_string())
            }
        })?;

        Ok(data.claims)
    }
}

// ============================================================================
// Claims Extractor
// ============================================================================

impl FromRequestParts<AppState> for Claims {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .map(|h| h.to_str().map_err(|_| AppError::ValidationError("Invalid token".to_string())))
            .transpose()?;

        Ok(state.verifier.verify(header)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SECRET, Duration::minutes(5))
    }

    #[test]
    fn test_round_trip_claims() {
        let token = issuer().issue("abebe@example.com").unwrap();
        let claims = CredentialVerifier::new(SECRET)
            .verify(Some(&format!("Bearer {}", token)))
            .unwrap();

        assert_eq!(claims.sub, "abebe@example.com");
        assert_eq!(claims.exp - claims.iat, 300);
    }

    #[test]
    fn test_missing_token_is_unauthenticated() {
        let verifier = CredentialVerifier::new(SECRET);
        assert!(matches!(verifier.verify(None), Err(CoreError::Unauthenticated(_))));
        assert!(matches!(verifier.verify(Some("  ")), Err(CoreError::Unauthenticated(_))));
    }

    #[test]
    fn test_malformed_token_is_bad_request() {
        let verifier = CredentialVerifier::new(SECRET);
        assert!(matches!(
            verifier.verify(Some("Bearer not-a-jwt")),
            Err(CoreError::BadRequest(_))
        ));
        assert!(matches!(
            verifier.verify(Some("Bearer aaa.bbb.ccc")),
            Err(CoreError::BadRequest(_))
        ));
    }

    #[test]
    fn test_foreign_signature_is_unauthenticated() {
        let token = TokenIssuer::new(b"other-secret", Duration::minutes(5))
            .issue("abebe@example.com")
            .unwrap();

        let result = CredentialVerifier::new(SECRET).verify(Some(&format!("Bearer {}", token)));
        assert!(matches!(result, Err(CoreError::Unauthenticated(_))));
    }

    #[test]
    fn test_expired_token_is_unauthenticated() {
        let token = issuer()
            .issue_at("abebe@example.com", Utc::now() - Duration::minutes(6))
            .unwrap();

        let result = CredentialVerifier::new(SECRET).verify(Some(&format!("Bearer {}", token)));
        assert!(matches!(result, Err(CoreError::Unauthenticated(_))));
    }

    #[test]
    fn test_token_with_only_subject_and_expiry_accepted() {
        let exp = (Utc::now() + Duration::minutes(5)).timestamp();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "sub": "abebe@example.com", "exp": exp }),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let claims = CredentialVerifier::new(SECRET)
            .verify(Some(&format!("Bearer {}", token)))
            .unwrap();
        assert_eq!(claims.subject(), "abebe@example.com");
        assert_eq!(claims.exp, exp);
    }

    #[test]
    fn test_token_without_bearer_prefix_accepted() {
        let token = issuer().issue("abebe@example.com").unwrap();
        let claims = CredentialVerifier::new(SECRET).verify(Some(&token)).unwrap();
        assert_eq!(claims.subject(), "abebe@example.com");
    }
}
