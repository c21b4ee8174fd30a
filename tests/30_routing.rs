mod common;

use anyhow::Result;
use reqwest::{Method, StatusCode};
use serde_json::json;

use common::{envelope, TestServer};
use vinca_api::config::AppConfig;

#[tokio::test]
async fn unknown_path_is_404_envelope() -> Result<()> {
    let server = TestServer::start().await?;

    let (status, body) = envelope(server.get("/nothing/here")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"status": "sys_route_not_found"}));
    Ok(())
}

#[tokio::test]
async fn unregistered_verb_is_405_envelope() -> Result<()> {
    let server = TestServer::start().await?;

    let (status, body) = envelope(server.client.delete(server.url("/api/v1/auth/login"))).await?;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({"status": "sys_method_not_allowed"}));
    Ok(())
}

#[tokio::test]
async fn longer_paths_fall_back_to_registered_prefix() -> Result<()> {
    let server = TestServer::start().await?;

    let (status, body) = envelope(server.get("/health/deep")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["database"], "memory");
    Ok(())
}

#[tokio::test]
async fn preflight_answers_without_authentication() -> Result<()> {
    let server = TestServer::start().await?;

    let res = server
        .client
        .request(Method::OPTIONS, server.url("/api/v1/home/store"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let headers = res.headers().clone();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert!(headers["access-control-allow-headers"]
        .to_str()?
        .contains("Vinca-Authentication"));
    assert!(headers["access-control-allow-methods"].to_str()?.contains("PATCH"));
    assert_eq!(headers.get_all("vary").iter().count(), 3);
    assert!(res.text().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn every_response_carries_allow_origin() -> Result<()> {
    let server = TestServer::start().await?;

    for path in ["/health", "/api/v1/auth/session", "/missing"] {
        let res = server.get(path).send().await?;
        assert_eq!(res.headers()["access-control-allow-origin"], "*", "{}", path);
    }
    Ok(())
}

#[tokio::test]
async fn cors_disabled_leaves_headers_off() -> Result<()> {
    let server = TestServer::start_with(AppConfig {
        bcrypt_cost: 4,
        cors: false,
        ..AppConfig::default()
    })
    .await?;

    let res = server.get("/health").send().await?;
    assert!(res.headers().get("access-control-allow-origin").is_none());

    let res = server
        .client
        .request(Method::OPTIONS, server.url("/health"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    Ok(())
}

#[tokio::test]
async fn oversized_body_is_invalid_params() -> Result<()> {
    let server = TestServer::start_with(AppConfig {
        bcrypt_cost: 4,
        max_body_bytes: 64,
        ..AppConfig::default()
    })
    .await?;

    let padding = "x".repeat(256);
    let (status, body) = envelope(
        server
            .post("/api/v1/auth/login")
            .json(&json!({"email": padding, "password": "x"})),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"status": "sys_invalid_params"}));
    Ok(())
}

#[tokio::test]
async fn zero_request_timeout_means_no_deadline() -> Result<()> {
    let server = TestServer::start_with(AppConfig {
        bcrypt_cost: 4,
        request_timeout_secs: 0,
        ..AppConfig::default()
    })
    .await?;

    let (status, body) = envelope(server.get("/health")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["database"], "memory");
    Ok(())
}
