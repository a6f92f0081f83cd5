mod common;

use anyhow::Result;
use reqwest::StatusCode;
use webtoon_api::config::AppConfig;

#[tokio::test]
async fn hundred_and_first_request_is_rejected() -> Result<()> {
    let server = common::spawn_server().await?;

    for i in 0..100 {
        let res = server.client.get(server.url("/test")).send().await?;
        assert_eq!(res.status(), StatusCode::OK, "request {} rejected", i + 1);
    }

    // Any endpoint, including a protected one
    let res = server
        .client
        .post(server.url("/api/webtoons"))
        .bearer_auth(server.token())
        .json(&common::sample("A"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(res.headers().contains_key("retry-after"));
    assert_eq!(res.text().await?, "Too many requests, please try again later.");

    let res = server.client.get(server.url("/api/webtoons")).send().await?;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    Ok(())
}

#[tokio::test]
async fn responses_carry_limit_headers() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.client.get(server.url("/test")).send().await?;
    assert_eq!(res.headers()["ratelimit-limit"], "100");
    assert_eq!(res.headers()["ratelimit-remaining"], "99");
    Ok(())
}

#[tokio::test]
async fn disabled_limiter_lets_everything_through() -> Result<()> {
    let mut config = AppConfig::development();
    config.rate_limit.enabled = false;
    let server = common::spawn_with(config).await?;

    for _ in 0..120 {
        let res = server.client.get(server.url("/test")).send().await?;
        assert_eq!(res.status(), StatusCode::OK);
    }
    Ok(())
}
