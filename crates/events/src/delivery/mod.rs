//! Out-of-band delivery of one-time codes.
//!
//! The [`Notifier`] port is consumed only by the authentication flow. Callers
//! treat it as fire-and-forget: they spawn the send and log failures, they
//! never hold a response on it.

use async_trait::async_trait;
use jotbook_core::otp::OtpPurpose;

pub mod email;
pub mod log;

/// Error type for delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

/// Delivers a one-time code to an address.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, address: &str, code: &str, purpose: OtpPurpose)
        -> Result<(), NotifyError>;
}
