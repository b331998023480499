mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::TestServer;

#[tokio::test]
async fn health_and_banner_respond() -> Result<()> {
    let server = TestServer::start().await?;

    let health: Value = server.get("/health").send().await?.json().await?;
    assert_eq!(health["success"], true);
    assert_eq!(health["data"]["status"], "ok");

    let banner: Value = server.get("/").send().await?.json().await?;
    assert_eq!(banner["data"]["name"], "fitreview-api");
    Ok(())
}

#[tokio::test]
async fn sign_up_sign_in_and_whoami() -> Result<()> {
    let server = TestServer::start().await?;

    let res = server
        .post("/auth/signup")
        .json(&json!({ "email": "Sam@Example.com", "password": "password123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["user"]["email"], "sam@example.com");
    assert_eq!(body["data"]["user"]["role"], "user");
    assert!(body["data"]["user"].get("password_hash").is_none());

    let (token, id) = server.sign_in("sam@example.com", "password123").await?;
    let me: Value = server
        .get("/api/auth/whoami")
        .bearer_auth(&token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(me["data"]["id"], id.as_str());
    assert_eq!(me["data"]["role"], "user");
    Ok(())
}

#[tokio::test]
async fn sign_up_rejects_bad_input_and_duplicates() -> Result<()> {
    let server = TestServer::start().await?;

    let res = server
        .post("/auth/signup")
        .json(&json!({ "email": "not-an-email", "password": "short" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["email"].is_string());

    server.sign_up("dup@example.com").await?;
    let res = server
        .post("/auth/signup")
        .json(&json!({ "email": "dup@example.com", "password": "password123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_unauthorized() -> Result<()> {
    let server = TestServer::start().await?;
    server.sign_up("sam@example.com").await?;

    let res = server
        .post("/auth/login")
        .json(&json!({ "email": "sam@example.com", "password": "nope-nope" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Invalid email or password");
    Ok(())
}

#[tokio::test]
async fn protected_routes_redirect_to_login() -> Result<()> {
    let server = TestServer::start().await?;

    let res = server.get("/api/auth/whoami").send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body["redirect"], "/login");

    let res = server.get("/api/auth/whoami").bearer_auth("garbage").send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn become_instructor_is_idempotent() -> Result<()> {
    let server = TestServer::start().await?;
    let (token, id) = server.sign_up("maya@example.com").await?;

    for _ in 0..2 {
        let res = server
            .post("/api/auth/become-instructor")
            .bearer_auth(&token)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await?;
        assert_eq!(body["data"]["user"]["role"], "instructor");
    }

    // the stale token still reads the stored role
    let me: Value = server
        .get("/api/auth/whoami")
        .bearer_auth(&token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(me["data"]["role"], "instructor");

    // an empty profile now shows in the directory
    let detail = server.get(&format!("/instructors/{}", id)).send().await?;
    assert_eq!(detail.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn sign_out_acknowledges() -> Result<()> {
    let server = TestServer::start().await?;
    let (token, _) = server.sign_up("sam@example.com").await?;

    let res = server.delete("/api/auth/session").bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["signed_out"], true);
    Ok(())
}

#[tokio::test]
async fn unparseable_bodies_use_the_error_envelope() -> Result<()> {
    let server = TestServer::start().await?;

    let res = server
        .post("/auth/signup")
        .header("content-type", "application/json")
        .body("{email: ")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "INVALID_JSON");

    let res = server
        .post("/auth/login")
        .body(r#"{"email": "sam@example.com", "password": "password123"}"#)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "UNSUPPORTED_MEDIA_TYPE");

    let (token, _) = server.sign_up("riley@example.com").await?;
    let res = server
        .put("/api/reviews/00000000-0000-0000-0000-000000000001")
        .bearer_auth(&token)
        .json(&json!({ "rating": "five" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "INVALID_JSON");
    Ok(())
}
