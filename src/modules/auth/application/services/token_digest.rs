use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};

/// Generates an opaque single-use token (verification, password reset).
/// 32 random bytes, hex-encoded. The raw value goes into the email link;
/// only its digest is persisted.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Hash a token with SHA-256 for storage. Raw tokens never touch the
/// database, so a leaked dump cannot be replayed against the API.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
