use poem::{http::StatusCode, test::TestClient};
use serde_json::json;

use crate::{
    core::test_utils::{generate_test_user, test_config, test_harness},
    init_openapi_route,
    repository::profile::get_profile,
};

#[tokio::test]
async fn test_update_profile_fields() -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let harness = test_harness();
    let test_user = generate_test_user(&harness.state, "ada@example.com", "password", "ada").await?;
    let app = init_openapi_route(harness.state.clone(), &config);
    let cli = TestClient::new(app);

    // When
    let resp = cli
        .put("/api/profile")
        .header("authorization", format!("Bearer {}", test_user.token))
        .body_json(&json!({
            "title": "Systems engineer",
            "bio": "I build **fast** things"
        }))
        .send()
        .await;

    // Expect
    resp.assert_status_is_ok();
    let stored = get_profile(harness.store.as_ref(), &test_user.identity.id)
        .await?
        .unwrap();
    assert_eq!(stored.title, "Systems engineer");
    assert_eq!(stored.bio, "I build **fast** things");
    assert_eq!(stored.username, "ada");
    Ok(())
}

#[tokio::test]
async fn test_username_change_moves_the_public_page() -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let harness = test_harness();
    let test_user = generate_test_user(&harness.state, "ada@example.com", "password", "ada").await?;
    let app = init_openapi_route(harness.state.clone(), &config);
    let cli = TestClient::new(app);

    // When
    let resp = cli
        .put("/api/profile")
        .header("authorization", format!("Bearer {}", test_user.token))
        .body_json(&json!({ "username": "lovelace" }))
        .send()
        .await;

    // Expect
    resp.assert_status_is_ok();
    let resp = cli.get("/api/portfolio/lovelace").send().await;
    resp.assert_status_is_ok();
    let resp = cli.get("/api/portfolio/ada").send().await;
    resp.assert_status(StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_username_change_conflict() -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let harness = test_harness();
    generate_test_user(&harness.state, "ada@example.com", "password", "ada").await?;
    let second = generate_test_user(&harness.state, "grace@example.com", "password", "grace").await?;
    let app = init_openapi_route(harness.state.clone(), &config);
    let cli = TestClient::new(app);

    // When
    let resp = cli
        .put("/api/profile")
        .header("authorization", format!("Bearer {}", second.token))
        .body_json(&json!({ "username": "ada" }))
        .send()
        .await;

    // Expect
    resp.assert_status(StatusCode::BAD_REQUEST);
    let stored = get_profile(harness.store.as_ref(), &second.identity.id)
        .await?
        .unwrap();
    assert_eq!(stored.username, "grace");
    Ok(())
}

#[tokio::test]
async fn test_picture_transform_bounds() -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let harness = test_harness();
    let test_user = generate_test_user(&harness.state, "ada@example.com", "password", "ada").await?;
    let app = init_openapi_route(harness.state.clone(), &config);
    let cli = TestClient::new(app);

    // When the scale is out of range
    let resp = cli
        .put("/api/profile/picture-transform")
        .header("authorization", format!("Bearer {}", test_user.token))
        .body_json(&json!({ "scale": 2.5, "offset_x": 0, "offset_y": 0 }))
        .send()
        .await;

    // Expect a refusal naming the field
    resp.assert_status(StatusCode::BAD_REQUEST);
    let json_body = resp.json().await;
    let message: String = json_body
        .value()
        .object()
        .get_opt("message")
        .unwrap()
        .deserialize();
    assert!(message.contains("picture_scale"));

    // When an offset is out of range
    let resp = cli
        .put("/api/profile/picture-transform")
        .header("authorization", format!("Bearer {}", test_user.token))
        .body_json(&json!({ "scale": 1.0, "offset_x": -51, "offset_y": 0 }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);

    // When the offsets are as far out of range as an i32 can go
    let resp = cli
        .put("/api/profile/picture-transform")
        .header("authorization", format!("Bearer {}", test_user.token))
        .body_json(&json!({ "scale": 1.0, "offset_x": i32::MIN, "offset_y": 0 }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);

    let resp = cli
        .put("/api/profile/picture-transform")
        .header("authorization", format!("Bearer {}", test_user.token))
        .body_json(&json!({ "scale": 1.0, "offset_x": 0, "offset_y": i32::MIN }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);

    // Nothing of the refused writes may have landed
    let stored = get_profile(harness.store.as_ref(), &test_user.identity.id)
        .await?
        .unwrap();
    assert_eq!(stored.picture_scale, 1.0);
    assert_eq!(stored.picture_offset_x, 0);
    assert_eq!(stored.picture_offset_y, 0);

    // When the values sit on the bounds
    let resp = cli
        .put("/api/profile/picture-transform")
        .header("authorization", format!("Bearer {}", test_user.token))
        .body_json(&json!({ "scale": 2.0, "offset_x": -50, "offset_y": 50 }))
        .send()
        .await;

    // Expect the write to land
    resp.assert_status_is_ok();
    let stored = get_profile(harness.store.as_ref(), &test_user.identity.id)
        .await?
        .unwrap();
    assert_eq!(stored.picture_scale, 2.0);
    assert_eq!(stored.picture_offset_x, -50);
    assert_eq!(stored.picture_offset_y, 50);
    Ok(())
}

#[tokio::test]
async fn test_picture_upload_stores_bytes_and_url() -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let harness = test_harness();
    let test_user = generate_test_user(&harness.state, "ada@example.com", "password", "ada").await?;
    let app = init_openapi_route(harness.state.clone(), &config);
    let cli = TestClient::new(app);

    // When
    let resp = cli
        .put("/api/profile/picture")
        .header("authorization", format!("Bearer {}", test_user.token))
        .content_type("application/octet-stream")
        .body(vec![0x89u8, 0x50, 0x4e, 0x47])
        .send()
        .await;

    // Expect
    resp.assert_status_is_ok();
    let expected_path = format!("pfp/{}", test_user.identity.id);
    assert_eq!(harness.assets.object_size(&expected_path).await, Some(4));
    let stored = get_profile(harness.store.as_ref(), &test_user.identity.id)
        .await?
        .unwrap();
    assert_eq!(stored.picture_url, format!("memory://{expected_path}"));
    Ok(())
}

#[tokio::test]
async fn test_profile_requires_token() -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let harness = test_harness();
    let app = init_openapi_route(harness.state.clone(), &config);
    let cli = TestClient::new(app);

    // When
    let resp = cli
        .get("/api/profile")
        .header("authorization", "Bearer not-a-session")
        .send()
        .await;

    // Expect
    resp.assert_status(StatusCode::UNAUTHORIZED);
    Ok(())
}
