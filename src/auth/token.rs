// src/auth/token.rs
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// 32 random bytes, ~43 characters once encoded.
pub const TOKEN_BYTES: usize = 32;

/// Fresh secret for a magic link or session cookie.
pub fn new_secret() -> String {
    generate_token(&mut OsRng, TOKEN_BYTES)
}

/// URL-safe, unpadded base64 of `nbytes` random bytes, safe in query strings and
/// cookie values without escaping.
pub fn generate_token<R: RngCore>(rng: &mut R, nbytes: usize) -> String {
    let mut buf = vec![0u8; nbytes];
    rng.fill_bytes(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf)
}

/// Only this digest is persisted; the raw secret stays with the browser.
pub fn hash_token(token: &str) -> [u8; 32] {
    let digest = Sha256::digest(token.as_bytes());
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}
