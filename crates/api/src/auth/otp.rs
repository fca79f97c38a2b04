//! Issuing and checking one-time codes.
//!
//! Only a digest of each code is stored (see
//! [`hash_code`](jotbook_core::otp::hash_code)). One live code exists per
//! email and purpose; issuing again replaces it.

use std::sync::Arc;

use chrono::Utc;
use jotbook_core::credentials::normalize_email;
use jotbook_core::otp::{
    generate_code, hash_code, is_well_formed, OtpPurpose, DEFAULT_CODE_EXPIRY_SECS,
    DEFAULT_MAX_ATTEMPTS,
};
use jotbook_db::repositories::VerificationCodeRepo;
use jotbook_events::Notifier;
use sqlx::PgPool;

/// One-time code settings.
#[derive(Debug, Clone)]
pub struct OtpConfig {
    /// Code lifetime in seconds (default: 300).
    pub expiry_secs: i64,
    /// Wrong guesses allowed before a code stops verifying (default: 3).
    pub max_attempts: i32,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            expiry_secs: DEFAULT_CODE_EXPIRY_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl OtpConfig {
    /// Load from `OTP_EXPIRY_SECS` and `OTP_MAX_ATTEMPTS`, falling back to
    /// the defaults when unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            expiry_secs: std::env::var("OTP_EXPIRY_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.expiry_secs),
            max_attempts: std::env::var("OTP_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_attempts),
        }
    }
}

/// Store a fresh code for `email` and hand it to the notifier.
///
/// Delivery runs on a spawned task; its failure is logged and never reaches
/// the caller.
pub async fn issue_code(
    pool: &PgPool,
    notifier: Arc<dyn Notifier>,
    config: &OtpConfig,
    email: &str,
    purpose: OtpPurpose,
) -> Result<(), sqlx::Error> {
    let email = normalize_email(email);
    let code = generate_code();
    let expires_at = Utc::now() + chrono::Duration::seconds(config.expiry_secs);

    VerificationCodeRepo::upsert(
        pool,
        &email,
        purpose.as_str(),
        &hash_code(&email, purpose, &code),
        expires_at,
    )
    .await?;
    tracing::debug!(%purpose, "One-time code issued");

    tokio::spawn(async move {
        if let Err(e) = notifier.send(&email, &code, purpose).await {
            tracing::warn!(error = %e, %purpose, "One-time code delivery failed");
        }
    });
    Ok(())
}

/// Check `code` against the live code for `email`/`purpose`.
///
/// Each well-formed check uses up one attempt. A match consumes the code;
/// once the limit is reached even the right code is refused.
pub async fn verify_code(
    pool: &PgPool,
    config: &OtpConfig,
    email: &str,
    purpose: OtpPurpose,
    code: &str,
) -> Result<bool, sqlx::Error> {
    if !is_well_formed(code) {
        return Ok(false);
    }
    let email = normalize_email(email);

    let Some(stored) = VerificationCodeRepo::find_live(pool, &email, purpose.as_str()).await?
    else {
        return Ok(false);
    };

    // Every check, right or wrong, spends an attempt before the digest is
    // compared.
    let Some(attempts) =
        VerificationCodeRepo::claim_attempt(pool, stored.id, config.max_attempts).await?
    else {
        tracing::debug!(%purpose, "One-time code exhausted");
        return Ok(false);
    };

    if stored.code_hash != hash_code(&email, purpose, code) {
        tracing::debug!(%purpose, attempts, "One-time code mismatch");
        return Ok(false);
    }

    // A concurrent verifier may have consumed it first.
    VerificationCodeRepo::consume(pool, stored.id).await
}
