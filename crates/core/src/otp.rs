//! Email one-time codes: purposes, generation, and hashing.
//!
//! A code is six decimal digits. Only a digest bound to the email and purpose
//! is persisted, so a code issued for `sign-in` cannot be replayed against
//! `forget-password` and vice versa.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::hashing::sha256_hex;

/// Number of digits in a generated code.
pub const CODE_LENGTH: usize = 6;

/// Default code lifetime in seconds.
pub const DEFAULT_CODE_EXPIRY_SECS: i64 = 300;

/// Default number of verification attempts before a code is burned.
pub const DEFAULT_MAX_ATTEMPTS: i32 = 3;

/// What a one-time code authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OtpPurpose {
    SignIn,
    EmailVerification,
    ForgetPassword,
}

impl OtpPurpose {
    /// Database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SignIn => "sign-in",
            Self::EmailVerification => "email-verification",
            Self::ForgetPassword => "forget-password",
        }
    }

    /// Subject line of the email carrying the code.
    pub fn email_subject(self) -> &'static str {
        match self {
            Self::SignIn => "Your sign-in code",
            Self::EmailVerification => "Verify your email",
            Self::ForgetPassword => "Reset your password",
        }
    }

    /// Plain-text body of the email carrying `code`.
    pub fn email_body(self, code: &str) -> String {
        match self {
            Self::SignIn => format!("Your sign-in code is {code}"),
            Self::EmailVerification => format!("Your verification code is {code}"),
            Self::ForgetPassword => format!("Your password reset code is {code}"),
        }
    }
}

impl fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OtpPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sign-in" => Ok(Self::SignIn),
            "email-verification" => Ok(Self::EmailVerification),
            "forget-password" => Ok(Self::ForgetPassword),
            other => Err(format!("Unknown code purpose '{other}'")),
        }
    }
}

/// Generate a fresh zero-padded six-digit code.
pub fn generate_code() -> String {
    let n: u32 = rand::rng().random_range(0..1_000_000);
    format!("{n:06}")
}

/// Digest stored for a code, bound to the (normalized) email and purpose.
pub fn hash_code(email: &str, purpose: OtpPurpose, code: &str) -> String {
    sha256_hex(format!("{email}\n{purpose}\n{}", code.trim()).as_bytes())
}

/// Whether `code` has the shape of a generated code.
pub fn is_well_formed(code: &str) -> bool {
    let code = code.trim();
    code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}
