use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by an access token. The payload identifies the subject
/// only; everything else is re-derived from the database on each request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
    pub nbf: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TokenError {
    #[error("Token has expired")]
    TokenExpired,

    #[error("Token is not yet valid")]
    TokenNotYetValid,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Malformed token")]
    MalformedToken,

    #[error("Token encoding error: {0}")]
    EncodingError(String),
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// Seconds until expiry, mirrored into the cookie max-age.
    pub expires_in: i64,
}

pub trait TokenProvider: Send + Sync {
    fn issue_access_token(&self, user_id: Uuid) -> Result<IssuedToken, TokenError>;

    fn verify_token(&self, token: &str) -> Result<TokenClaims, TokenError>;
}
