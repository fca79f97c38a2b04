//! Stateless, signed OAuth `state` parameters.
//!
//! The state handed to the identity provider is `"{nonce}.{expires_at}.{sig}"`
//! where `sig` is the hex HMAC-SHA256 of `"{nonce}.{expires_at}"`. The
//! callback verifies the signature and expiry without any server-side storage.

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Length of the random nonce in characters.
const NONCE_LENGTH: usize = 24;

/// Why a presented state was rejected.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("malformed state")]
    Malformed,
    #[error("state signature mismatch")]
    BadSignature,
    #[error("state expired")]
    Expired,
}

/// Issue a signed state valid until `expires_at` (Unix seconds).
pub fn sign_state(secret: &str, expires_at: i64) -> String {
    let nonce: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect();
    let payload = format!("{nonce}.{expires_at}");
    let sig = hex_encode(&mac_for(secret, &payload).finalize().into_bytes());
    format!("{payload}.{sig}")
}

/// Verify a state produced by [`sign_state`] at time `now` (Unix seconds).
pub fn verify_state(secret: &str, state: &str, now: i64) -> Result<(), StateError> {
    let (payload, sig_hex) = state.rsplit_once('.').ok_or(StateError::Malformed)?;
    let (nonce, expires_at) = payload.split_once('.').ok_or(StateError::Malformed)?;
    if nonce.is_empty() {
        return Err(StateError::Malformed);
    }
    let expires_at: i64 = expires_at.parse().map_err(|_| StateError::Malformed)?;
    let sig = hex_decode(sig_hex).ok_or(StateError::Malformed)?;

    mac_for(secret, payload)
        .verify_slice(&sig)
        .map_err(|_| StateError::BadSignature)?;

    if expires_at < now {
        return Err(StateError::Expired);
    }
    Ok(())
}

fn mac_for(secret: &str, payload: &str) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload.as_bytes());
    mac
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hex_decode(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(s.get(i..i + 2)?, 16).ok())
        .collect()
}
