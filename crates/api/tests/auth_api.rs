//! HTTP-level integration tests for account and token endpoints.
//!
//! Covers password sign-up/sign-in, refresh rotation, sign-out, one-time
//! code flows and the Google sign-in entry points.

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{body_json, get, get_auth, post_auth, post_json, token_for};
use jotbook_api::auth::google::GoogleOAuthConfig;
use jotbook_api::auth::password::hash_password;
use jotbook_core::otp::{hash_code, OtpPurpose};
use jotbook_db::models::user::{CreateUser, User};
use jotbook_db::repositories::{UserRepo, VerificationCodeRepo};
use serde_json::json;
use sqlx::PgPool;

const PASSWORD: &str = "correct-horse-battery";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_password_user(pool: &PgPool, email: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            name: "Test User".to_string(),
            password_hash: Some(hash_password(PASSWORD).expect("hashing should succeed")),
            email_verified: true,
            google_subject: None,
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Plant a known code, bypassing delivery.
async fn plant_code(pool: &PgPool, email: &str, purpose: OtpPurpose, code: &str) {
    VerificationCodeRepo::upsert(
        pool,
        email,
        purpose.as_str(),
        &hash_code(email, purpose, code),
        Utc::now() + chrono::Duration::minutes(5),
    )
    .await
    .expect("code insert should succeed");
}

async fn sign_in(pool: &PgPool, email: &str, password: &str) -> axum::http::Response<axum::body::Body> {
    let body = json!({ "email": email, "password": password });
    post_json(common::build_test_app(pool.clone()), "/api/v1/auth/sign-in", body).await
}

// ---------------------------------------------------------------------------
// Sign-up / sign-in
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sign_up_creates_unverified_user_and_issues_code(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let body = json!({ "name": "Ada", "email": "  Ada@Example.com ", "password": PASSWORD });
    let response = post_json(app, "/api/v1/auth/sign-up", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["expires_in"], 15 * 60);
    assert_eq!(json["user"]["email"], "ada@example.com");
    assert_eq!(json["user"]["name"], "Ada");
    assert_eq!(json["user"]["email_verified"], false);
    assert!(json["user"].get("password_hash").is_none());

    let code = VerificationCodeRepo::find_live(&pool, "ada@example.com", "email-verification")
        .await
        .unwrap();
    assert!(code.is_some(), "sign-up must issue an email verification code");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sign_up_duplicate_email_is_409(pool: PgPool) {
    create_password_user(&pool, "taken@example.com").await;
    let app = common::build_test_app(pool);

    let body = json!({ "name": "Other", "email": "TAKEN@example.com", "password": PASSWORD });
    let response = post_json(app, "/api/v1/auth/sign-up", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sign_up_validates_input(pool: PgPool) {
    let cases = [
        json!({ "name": "A", "email": "a@example.com", "password": PASSWORD }),
        json!({ "name": "Ada", "email": "not-an-email", "password": PASSWORD }),
        json!({ "name": "Ada", "email": "a@example.com", "password": "short" }),
    ];
    for body in cases {
        let app = common::build_test_app(pool.clone());
        let response = post_json(app, "/api/v1/auth/sign-up", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sign_in_success(pool: PgPool) {
    let user = create_password_user(&pool, "grace@example.com").await;

    let response = sign_in(&pool, "Grace@Example.com", PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["id"], user.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sign_in_failures_are_uniform_401(pool: PgPool) {
    create_password_user(&pool, "grace@example.com").await;
    UserRepo::create(
        &pool,
        &CreateUser {
            email: "nopass@example.com".into(),
            name: "No Pass".into(),
            password_hash: None,
            email_verified: true,
            google_subject: None,
        },
    )
    .await
    .unwrap();

    for (email, password) in [
        ("grace@example.com", "wrong-password"),
        ("ghost@example.com", PASSWORD),
        ("nopass@example.com", PASSWORD),
    ] {
        let response = sign_in(&pool, email, password).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "Invalid email or password");
    }
}

// ---------------------------------------------------------------------------
// Token lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_rotates_token(pool: PgPool) {
    create_password_user(&pool, "rot@example.com").await;
    let login = body_json(sign_in(&pool, "rot@example.com", PASSWORD).await).await;
    let refresh_token = login["refresh_token"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_ne!(json["refresh_token"].as_str().unwrap(), refresh_token);

    // The old token was revoked by the rotation.
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sign_out_revokes_refresh_tokens(pool: PgPool) {
    create_password_user(&pool, "out@example.com").await;
    let login = body_json(sign_in(&pool, "out@example.com", PASSWORD).await).await;
    let access = login["access_token"].as_str().unwrap();
    let refresh = login["refresh_token"].as_str().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_auth(app, "/api/v1/auth/sign-out", access).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response =
        post_json(app, "/api/v1/auth/refresh", json!({ "refresh_token": refresh })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_requires_auth_and_returns_profile(pool: PgPool) {
    let user = create_password_user(&pool, "me@example.com").await;

    let response = get(common::build_test_app(pool.clone()), "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/auth/me", &token_for(user.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], user.id);
    assert_eq!(json["data"]["email"], "me@example.com");
}

// ---------------------------------------------------------------------------
// One-time codes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_send_code_is_202_whether_or_not_account_exists(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let body = json!({ "email": "nobody@example.com", "purpose": "forget-password" });
    let response = post_json(app, "/api/v1/auth/otp/send", body).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert!(
        VerificationCodeRepo::find_live(&pool, "nobody@example.com", "forget-password")
            .await
            .unwrap()
            .is_none()
    );

    let app = common::build_test_app(pool.clone());
    let body = json!({ "email": "newcomer@example.com", "purpose": "sign-in" });
    let response = post_json(app, "/api/v1/auth/otp/send", body).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert!(
        VerificationCodeRepo::find_live(&pool, "newcomer@example.com", "sign-in")
            .await
            .unwrap()
            .is_some()
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_otp_sign_in_creates_account(pool: PgPool) {
    plant_code(&pool, "fresh@example.com", OtpPurpose::SignIn, "123456").await;

    let app = common::build_test_app(pool.clone());
    let body = json!({ "email": "Fresh@Example.com", "otp": "123456" });
    let response = post_json(app, "/api/v1/auth/otp/sign-in", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["email"], "fresh@example.com");
    assert_eq!(json["user"]["name"], "fresh");
    assert_eq!(json["user"]["email_verified"], true);

    // Consumed: the same code cannot be used twice.
    let app = common::build_test_app(pool);
    let body = json!({ "email": "fresh@example.com", "otp": "123456" });
    let response = post_json(app, "/api/v1/auth/otp/sign-in", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_code_is_burned_after_max_attempts(pool: PgPool) {
    plant_code(&pool, "guess@example.com", OtpPurpose::SignIn, "111111").await;

    for wrong in ["000000", "222222", "333333"] {
        let app = common::build_test_app(pool.clone());
        let body = json!({ "email": "guess@example.com", "otp": wrong });
        let response = post_json(app, "/api/v1/auth/otp/sign-in", body).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "Invalid or expired code");
    }

    let app = common::build_test_app(pool);
    let body = json!({ "email": "guess@example.com", "otp": "111111" });
    let response = post_json(app, "/api/v1/auth/otp/sign-in", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_verify_email_marks_user_verified(pool: PgPool) {
    let user = UserRepo::create(
        &pool,
        &CreateUser {
            email: "verify@example.com".into(),
            name: "Verify Me".into(),
            password_hash: None,
            email_verified: false,
            google_subject: None,
        },
    )
    .await
    .unwrap();
    plant_code(&pool, "verify@example.com", OtpPurpose::EmailVerification, "654321").await;

    let app = common::build_test_app(pool.clone());
    let body = json!({ "email": "verify@example.com", "otp": "654321" });
    let response = post_json(app, "/api/v1/auth/otp/verify-email", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let reloaded = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(reloaded.email_verified);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reset_password_replaces_password_and_revokes_sessions(pool: PgPool) {
    create_password_user(&pool, "reset@example.com").await;
    let login = body_json(sign_in(&pool, "reset@example.com", PASSWORD).await).await;
    let old_refresh = login["refresh_token"].as_str().unwrap().to_string();

    plant_code(&pool, "reset@example.com", OtpPurpose::ForgetPassword, "777777").await;
    let app = common::build_test_app(pool.clone());
    let body = json!({ "email": "reset@example.com", "otp": "777777", "password": "brand-new-pass" });
    let response = post_json(app, "/api/v1/auth/otp/reset-password", body).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(
        sign_in(&pool, "reset@example.com", PASSWORD).await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        sign_in(&pool, "reset@example.com", "brand-new-pass").await.status(),
        StatusCode::OK
    );

    let app = common::build_test_app(pool);
    let response =
        post_json(app, "/api/v1/auth/refresh", json!({ "refresh_token": old_refresh })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Google sign-in
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_google_routes_404_when_not_configured(pool: PgPool) {
    let response = get(common::build_test_app(pool.clone()), "/api/v1/auth/google").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(
        common::build_test_app(pool),
        "/api/v1/auth/google/callback?code=c&state=s",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

fn google_config() -> jotbook_api::config::ServerConfig {
    jotbook_api::config::ServerConfig {
        google: Some(GoogleOAuthConfig {
            client_id: "client-id".into(),
            client_secret: "client-secret".into(),
            redirect_uri: "http://localhost:3000/api/v1/auth/google/callback".into(),
            auth_url: "https://accounts.example.test/auth".into(),
            token_url: "http://127.0.0.1:1/token".into(),
            userinfo_url: "http://127.0.0.1:1/userinfo".into(),
        }),
        ..common::test_config()
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_google_start_redirects_with_signed_state(pool: PgPool) {
    let app = common::build_test_app_with_config(pool, google_config());
    let response = get(app, "/api/v1/auth/google").await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = response.headers()["location"].to_str().unwrap();
    assert!(location.starts_with("https://accounts.example.test/auth?"));
    assert!(location.contains("client_id=client-id"));
    assert!(location.contains("state="));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_google_callback_rejects_forged_state(pool: PgPool) {
    let app = common::build_test_app_with_config(pool, google_config());
    let response = get(
        app,
        "/api/v1/auth/google/callback?code=abc&state=nonce.9999999999.deadbeef",
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid OAuth state");
}
