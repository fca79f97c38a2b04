//! Google OAuth 2.0 authorization-code flow.
//!
//! [`authorize_url`] builds the consent-screen redirect; [`fetch_user_info`]
//! trades the returned code for an access token and reads the account's
//! OpenID userinfo.

use reqwest::Url;
use serde::Deserialize;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Lifetime of the signed `state` parameter, in seconds.
pub const STATE_TTL_SECS: i64 = 600;

const SCOPES: &str = "openid email profile";

/// Google client registration.
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Must point at `/api/v1/auth/google/callback` on this server.
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
}

impl GoogleOAuthConfig {
    /// Load from `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET` and
    /// `GOOGLE_REDIRECT_URI`. Returns `None` unless all three are set.
    pub fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Some(Self {
            client_id: var("GOOGLE_CLIENT_ID")?,
            client_secret: var("GOOGLE_CLIENT_SECRET")?,
            redirect_uri: var("GOOGLE_REDIRECT_URI")?,
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GoogleError {
    #[error("Invalid Google endpoint URL: {0}")]
    Endpoint(String),

    #[error("Google request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Subset of the OpenID userinfo document we use.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    pub name: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Consent-screen URL carrying `state`.
pub fn authorize_url(config: &GoogleOAuthConfig, state: &str) -> Result<Url, GoogleError> {
    Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", SCOPES),
            ("state", state),
            ("prompt", "select_account"),
        ],
    )
    .map_err(|e| GoogleError::Endpoint(e.to_string()))
}

/// Exchange an authorization code and return the account's userinfo.
pub async fn fetch_user_info(
    http: &reqwest::Client,
    config: &GoogleOAuthConfig,
    code: &str,
) -> Result<GoogleUserInfo, GoogleError> {
    let token: TokenResponse = http
        .post(&config.token_url)
        .form(&[
            ("code", code),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let info = http
        .get(&config.userinfo_url)
        .bearer_auth(&token.access_token)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(info)
}
