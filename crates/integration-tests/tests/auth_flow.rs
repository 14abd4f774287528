//! Sign-in, OTP, password recovery and sign-out.

use dryklin_admin::api::{AuthApi, AuthError};
use dryklin_admin::navigation::routes;
use dryklin_integration_tests::TestContext;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn profile_json() -> serde_json::Value {
    json!({ "_id": "u-1", "name": "Ops Lead", "email": "ops@dryklin.com", "role": "SUPER_ADMIN" })
}

#[tokio::test]
async fn test_login_stores_session_and_goes_to_dashboard() {
    let ctx = TestContext::new().await;
    ctx.visit(routes::SIGN_IN);

    Mock::given(method("POST"))
        .and(path(TestContext::api("/auth/login")))
        .and(body_json(json!({ "email": "ops@dryklin.com", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Login successful",
            "data": { "accessToken": "acc", "refreshToken": "ref", "admin": profile_json() }
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let auth = AuthApi::new(ctx.client.clone());
    let profile = auth
        .login(" Ops@DryKlin.com ", &SecretString::from("hunter2"))
        .await
        .unwrap();

    assert_eq!(profile.email, "ops@dryklin.com");
    let stored = ctx.vault().credentials().unwrap();
    assert_eq!(stored.access_token.expose_secret(), "acc");
    assert_eq!(stored.refresh_token.expose_secret(), "ref");
    assert_eq!(ctx.raw_access_token().as_deref(), Some("ENC(acc)"));
    assert_eq!(ctx.vault().profile().unwrap().name.as_deref(), Some("Ops Lead"));
    assert_eq!(ctx.navigator.redirects(), vec![routes::DASHBOARD.to_string()]);
}

#[tokio::test]
async fn test_login_fetches_profile_when_response_has_none() {
    let ctx = TestContext::new().await;
    ctx.visit(routes::SIGN_IN);

    Mock::given(method("POST"))
        .and(path(TestContext::api("/auth/login")))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "accessToken": "acc", "refreshToken": "ref" })),
        )
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path(TestContext::api("/auth/me")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": profile_json() })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let auth = AuthApi::new(ctx.client.clone());
    auth.login("ops@dryklin.com", &SecretString::from("hunter2"))
        .await
        .unwrap();

    assert_eq!(
        ctx.auth_headers("/auth/me").await,
        vec![Some("Bearer acc".to_string())]
    );
    assert!(ctx.vault().profile().is_some());
}

#[tokio::test]
async fn test_wrong_password_does_not_log_out() {
    let ctx = TestContext::new().await;
    ctx.visit(routes::SIGN_IN);

    Mock::given(method("POST"))
        .and(path(TestContext::api("/auth/login")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })))
        .mount(&ctx.server)
        .await;

    let auth = AuthApi::new(ctx.client.clone());
    let err = auth
        .login("ops@dryklin.com", &SecretString::from("wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Api(ref e) if e.is_auth_failure()));
    assert!(ctx.navigator.redirects().is_empty());
    assert!(ctx.vault().credentials().is_none());
}

#[tokio::test]
async fn test_login_without_tokens_is_rejected() {
    let ctx = TestContext::new().await;
    ctx.visit(routes::SIGN_IN);

    Mock::given(method("POST"))
        .and(path(TestContext::api("/auth/login")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "OTP sent" })))
        .mount(&ctx.server)
        .await;

    let auth = AuthApi::new(ctx.client.clone());
    let err = auth
        .login("ops@dryklin.com", &SecretString::from("hunter2"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::MissingTokens));
    assert!(ctx.store.is_empty());
}

#[tokio::test]
async fn test_malformed_email_makes_no_request() {
    let ctx = TestContext::new().await;
    let auth = AuthApi::new(ctx.client.clone());

    let err = auth
        .login("not-an-email", &SecretString::from("hunter2"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidEmail(_)));
    assert!(ctx.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_otp_round_trip_uses_remembered_email() {
    let ctx = TestContext::new().await;
    ctx.visit(routes::VERIFY_OTP);

    Mock::given(method("POST"))
        .and(path(TestContext::api("/auth/otp/send")))
        .and(body_json(json!({ "email": "ops@dryklin.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "sent" })))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path(TestContext::api("/auth/otp/verify")))
        .and(body_json(json!({ "email": "ops@dryklin.com", "otp": "123456" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "verified" })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let auth = AuthApi::new(ctx.client.clone());
    auth.request_otp("ops@dryklin.com").await.unwrap();
    assert_eq!(
        ctx.vault().temp_email().map(|e| e.as_str().to_owned()),
        Some("ops@dryklin.com".to_string())
    );

    auth.verify_otp(" 123456 ").await.unwrap();
    assert!(ctx.vault().temp_email().is_none());
}

#[tokio::test]
async fn test_verify_without_pending_email() {
    let ctx = TestContext::new().await;
    let auth = AuthApi::new(ctx.client.clone());

    let err = auth.verify_otp("123456").await.unwrap_err();
    assert!(matches!(err, AuthError::NoPendingEmail));
}

#[tokio::test]
async fn test_password_recovery_requests() {
    let ctx = TestContext::new().await;
    ctx.visit(routes::FORGOT_PASSWORD);

    Mock::given(method("POST"))
        .and(path(TestContext::api("/auth/password/forgot")))
        .and(body_json(json!({ "email": "ops@dryklin.com" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path(TestContext::api("/auth/password/reset")))
        .and(body_json(json!({ "token": "tok-1", "newPassword": "n3w-Pass!" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let auth = AuthApi::new(ctx.client.clone());
    auth.forgot_password("ops@dryklin.com").await.unwrap();
    ctx.visit(routes::RESET_PASSWORD);
    auth.reset_password("tok-1", &SecretString::from("n3w-Pass!"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_logout_clears_session_even_if_server_fails() {
    let ctx = TestContext::new().await;
    ctx.sign_in("acc", "ref");

    Mock::given(method("POST"))
        .and(path(TestContext::api("/auth/logout")))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&ctx.server)
        .await;

    AuthApi::new(ctx.client.clone()).logout().await;

    assert!(ctx.store.is_empty());
    assert_eq!(ctx.sign_in_redirects(), 1);
    assert_eq!(ctx.current_route(), routes::SIGN_IN);
}

#[tokio::test]
async fn test_logout_with_expired_session_redirects_once() {
    let ctx = TestContext::new().await;
    ctx.sign_in("stale", "revoked");

    Mock::given(method("POST"))
        .and(path(TestContext::api("/auth/logout")))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path(TestContext::api("/auth/tokens/refresh")))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&ctx.server)
        .await;

    AuthApi::new(ctx.client.clone()).logout().await;

    assert!(ctx.store.is_empty());
    assert_eq!(ctx.navigator.redirects(), vec![routes::SIGN_IN.to_string()]);
}

#[tokio::test]
async fn test_current_profile_is_cached() {
    let ctx = TestContext::new().await;
    ctx.sign_in("acc", "ref");

    Mock::given(method("GET"))
        .and(path(TestContext::api("/auth/me")))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json()))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let auth = AuthApi::new(ctx.client.clone());
    let first = auth.current_profile().await.unwrap();
    let second = auth.current_profile().await.unwrap();
    assert_eq!(first, second);
}
