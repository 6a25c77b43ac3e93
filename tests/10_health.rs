mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn root_serves_welcome_text() -> Result<()> {
    let server = common::ensure_server().await?;

    let text = reqwest::get(format!("{}/", server.base_url)).await?.text().await?;
    assert_eq!(text, "Welcome to Todo API");
    Ok(())
}
