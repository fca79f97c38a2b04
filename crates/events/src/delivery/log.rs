//! Notifier used when no email transport is configured.

use async_trait::async_trait;
use jotbook_core::otp::OtpPurpose;

use super::{NotifyError, Notifier};

/// Drops codes on the floor, leaving a trace that delivery was skipped.
///
/// The code itself is never logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(
        &self,
        address: &str,
        _code: &str,
        purpose: OtpPurpose,
    ) -> Result<(), NotifyError> {
        tracing::warn!(
            to = address,
            %purpose,
            "Email delivery not configured; one-time code was not sent"
        );
        Ok(())
    }
}
