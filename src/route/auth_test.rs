use poem::{http::StatusCode, test::TestClient};
use serde_json::json;

use crate::{
    core::test_utils::{test_config, test_harness},
    init_openapi_route,
};

#[tokio::test]
async fn test_signup_login_logout_flow() -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let harness = test_harness();
    let app = init_openapi_route(harness.state.clone(), &config);
    let cli = TestClient::new(app);

    // When signing up
    let resp = cli
        .post("/api/auth/signup")
        .body_json(&json!({
            "email": "ada@example.com",
            "password": "password",
            "username": "ada"
        }))
        .send()
        .await;

    // Expect signup
    resp.assert_status(StatusCode::CREATED);
    let json_body = resp.json().await;
    let username = json_body.value().object().get_opt("username");
    assert!(username.is_some());
    let username: String = username.unwrap().deserialize();
    assert_eq!(username, "ada");

    // When logging in
    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({
            "email": "ada@example.com",
            "password": "password"
        }))
        .send()
        .await;

    // Expect login
    resp.assert_status_is_ok();
    let json_body = resp.json().await;
    let token = json_body.value().object().get_opt("token");
    assert!(token.is_some());
    let token: String = token.unwrap().deserialize();

    // When fetching the own profile with the token
    let resp = cli
        .get("/api/profile")
        .header("authorization", format!("Bearer {}", token))
        .send()
        .await;

    // Expect profile
    resp.assert_status_is_ok();
    let json_body = resp.json().await;
    let profile_username: String = json_body
        .value()
        .object()
        .get_opt("username")
        .unwrap()
        .deserialize();
    assert_eq!(profile_username, "ada");

    // When logging out
    let resp = cli
        .post("/api/auth/logout")
        .header("authorization", format!("Bearer {}", token))
        .send()
        .await;

    // Expect logout
    resp.assert_status(StatusCode::NO_CONTENT);

    // When logging out again with the dead token
    let resp = cli
        .post("/api/auth/logout")
        .header("authorization", format!("Bearer {}", token))
        .send()
        .await;

    // Expect second logout
    resp.assert_status(StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_signup_duplicate_username_is_refused() -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let harness = test_harness();
    let app = init_openapi_route(harness.state.clone(), &config);
    let cli = TestClient::new(app);
    let resp = cli
        .post("/api/auth/signup")
        .body_json(&json!({
            "email": "ada@example.com",
            "password": "password",
            "username": "ada"
        }))
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);

    // When a second account wants the same username
    let resp = cli
        .post("/api/auth/signup")
        .body_json(&json!({
            "email": "grace@example.com",
            "password": "password",
            "username": "ada"
        }))
        .send()
        .await;

    // Expect a refusal and a rolled back identity
    resp.assert_status(StatusCode::BAD_REQUEST);
    let json_body = resp.json().await;
    let message: String = json_body
        .value()
        .object()
        .get_opt("message")
        .unwrap()
        .deserialize();
    assert_eq!(message, "Username already taken");
    assert_eq!(harness.identity.account_count().await, 1);

    // Login for the rolled back account must fail
    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({
            "email": "grace@example.com",
            "password": "password"
        }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_login_with_bad_credentials() -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let harness = test_harness();
    let app = init_openapi_route(harness.state.clone(), &config);
    let cli = TestClient::new(app);

    // When
    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({
            "email": "nobody@example.com",
            "password": "password"
        }))
        .send()
        .await;

    // Expect
    resp.assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_reset_password() -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let harness = test_harness();
    let app = init_openapi_route(harness.state.clone(), &config);
    let cli = TestClient::new(app);

    // When
    let resp = cli
        .post("/api/auth/reset-password")
        .body_json(&json!({ "email": "ada@example.com" }))
        .send()
        .await;

    // Expect
    resp.assert_status_is_ok();
    resp.assert_json(&json!({ "message": "Password reset email sent" }))
        .await;
    Ok(())
}
