mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::{authed, envelope, TestServer};

#[tokio::test]
async fn health_reports_memory_backend() -> Result<()> {
    let server = TestServer::start().await?;

    let (status, body) = envelope(server.get("/health")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success", "content": {"database": "memory"}}));
    Ok(())
}

#[tokio::test]
async fn register_login_and_fetch_session() -> Result<()> {
    let server = TestServer::start().await?;

    let (status, body) = envelope(server.post("/api/v1/auth/register").json(&json!({
        "username": "alice",
        "email": "alice@example.com",
        "password": "hunter2",
        "dark_mode": true
    })))
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["content"]["username"], "alice");
    assert_eq!(body["content"]["dark_mode"], true);
    assert!(body["content"].get("password").is_none());
    assert!(body["content"].get("password_hash").is_none());
    assert!(body["content"].get("id").is_none());

    let (status, body) = envelope(
        server
            .post("/api/v1/auth/login")
            .json(&json!({"email": "alice@example.com", "password": "hunter2"})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let token = body["content"]["uuid"].as_str().unwrap().to_string();
    assert_eq!(body["content"]["email"], "alice@example.com");

    let (status, body) = envelope(authed(server.get("/api/v1/auth/session"), &token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["username"], "alice");
    Ok(())
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() -> Result<()> {
    let server = TestServer::start().await?;
    server.signup("bob").await?;

    for credentials in [
        json!({"email": "bob@example.com", "password": "wrong"}),
        json!({"email": "nobody@example.com", "password": "hunter2"}),
    ] {
        let (status, body) = envelope(server.post("/api/v1/auth/login").json(&credentials)).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"status": "user_login_invalid"}));
    }
    Ok(())
}

#[tokio::test]
async fn registration_rejects_bad_data_and_duplicates() -> Result<()> {
    let server = TestServer::start().await?;

    let (status, body) = envelope(server.post("/api/v1/auth/register").json(&json!({
        "username": "not valid 123",
        "email": "carol@example.com",
        "password": "x"
    })))
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"status": "user_data_invalid"}));

    server.signup("carol").await?;
    let (status, body) = envelope(server.post("/api/v1/auth/register").json(&json!({
        "username": "carol",
        "email": "carol@example.com",
        "password": "x"
    })))
    .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({"status": "user_email_used"}));

    let (status, body) = envelope(
        server
            .post("/api/v1/auth/register")
            .header("content-type", "application/json")
            .body("{\"username\": "),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"status": "sys_invalid_params"}));
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_valid_session() -> Result<()> {
    let server = TestServer::start().await?;

    let (status, body) = envelope(server.get("/api/v1/auth/session")).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"status": "user_session_invalid"}));

    for token in ["garbage", "6f1c2d3e-4b5a-4c6d-8e7f-0123456789ab"] {
        let (status, body) = envelope(authed(server.get("/api/v1/home/container"), token)).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"status": "user_session_invalid"}));
    }
    Ok(())
}

#[tokio::test]
async fn sessions_expire_after_configured_ttl() -> Result<()> {
    let server = TestServer::start_with(vinca_api::config::AppConfig {
        bcrypt_cost: 4,
        session_ttl_secs: Some(0),
        ..Default::default()
    })
    .await?;
    let token = server.signup("dave").await?;

    let (status, _) = envelope(authed(server.get("/api/v1/auth/session"), &token)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn user_settings_update() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.signup("erin").await?;
    server.signup("frank").await?;

    let (status, body) = envelope(
        authed(server.patch("/api/v1/auth/user"), &token).json(&json!({"email": "frank@example.com"})),
    )
    .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "user_email_used");

    let (status, body) = envelope(authed(server.patch("/api/v1/auth/user"), &token).json(&json!({
        "email": "erin@example.com",
        "password": "correct horse",
        "dark_mode": true
    })))
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["dark_mode"], true);

    let (status, _) = envelope(
        server
            .post("/api/v1/auth/login")
            .json(&json!({"email": "erin@example.com", "password": "correct horse"})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = envelope(
        server
            .post("/api/v1/auth/login")
            .json(&json!({"email": "erin@example.com", "password": "hunter2"})),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registrations_create_one_account() -> Result<()> {
    let server = TestServer::start().await?;

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let client = server.client.clone();
        let url = server.url("/api/v1/auth/register");
        tasks.push(tokio::spawn(async move {
            let res = client
                .post(url)
                .json(&json!({"username": "eve", "email": "eve@example.com", "password": "hunter2"}))
                .send()
                .await?;
            let status = res.status();
            let body = res.json::<serde_json::Value>().await?;
            anyhow::Ok((status, body))
        }));
    }

    let mut created = 0;
    for task in tasks {
        let (status, body) = task.await??;
        match status {
            StatusCode::OK => created += 1,
            StatusCode::CONFLICT => assert_eq!(body, json!({"status": "user_email_used"})),
            other => panic!("unexpected status {}: {}", other, body),
        }
    }
    assert_eq!(created, 1);
    Ok(())
}
