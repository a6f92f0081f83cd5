mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn writes_without_header_are_401() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .post(server.url("/api/webtoons"))
        .json(&common::sample("A"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.json::<Value>().await?["message"], "Authentication token is required");

    let id = uuid::Uuid::new_v4();
    let res = server
        .client
        .delete(server.url(&format!("/api/webtoons/{}", id)))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn blank_header_counts_as_missing() -> Result<()> {
    let server = common::spawn_server().await?;

    for header in ["", "   "] {
        let res = server
            .client
            .post(server.url("/api/webtoons"))
            .header("authorization", header)
            .json(&common::sample("A"))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "header {:?}", header);
        assert_eq!(res.json::<Value>().await?["message"], "Authentication token is required");
    }
    Ok(())
}

#[tokio::test]
async fn bad_tokens_are_403() -> Result<()> {
    let server = common::spawn_server().await?;

    let headers = [
        "Bearer not.a.jwt".to_string(),
        "Bearer".to_string(),
        format!("Bearer {}", server.expired_token()),
    ];

    for header in headers {
        let res = server
            .client
            .post(server.url("/api/webtoons"))
            .header("authorization", &header)
            .json(&common::sample("A"))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::FORBIDDEN, "header {:?}", header);
        assert_eq!(res.json::<Value>().await?["message"], "Invalid or expired token");
    }
    Ok(())
}

#[tokio::test]
async fn auth_runs_before_validation() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .post(server.url("/api/webtoons"))
        .json(&serde_json::json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn reads_need_no_token() -> Result<()> {
    let server = common::spawn_server().await?;
    let id = server.create_ok("A").await?;

    let res = server.client.get(server.url("/api/webtoons")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = server
        .client
        .get(server.url(&format!("/api/webtoons/{}", id)))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}
