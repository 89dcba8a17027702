mod common;

use std::time::Duration;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{FakeCloner, TestServer};

const REPO: &str = "https://example.com/portfolio.git";

async fn start(files: &[(&str, &str)]) -> Result<TestServer> {
    TestServer::start_with(FakeCloner::with_files(files), Duration::ZERO).await
}

#[tokio::test]
async fn setup_accepts_empty_repository() -> Result<()> {
    let server = start(&[]).await?;

    let res = server.post("/api/admin/setup", json!({ "repoUrl": REPO })).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(server.data_path().join(".git").is_dir());

    let body: Value = server.get("/health").send().await?.json().await?;
    assert_eq!(body["data"]["initialized"], true);
    Ok(())
}

#[tokio::test]
async fn setup_refused_once_initialized() -> Result<()> {
    let server = start(&[]).await?;

    let first = server.post("/api/admin/setup", json!({ "repoUrl": REPO })).send().await?;
    assert_eq!(first.status(), StatusCode::OK);

    let second = server
        .post("/api/admin/setup", json!({ "repoUrl": REPO, "branch": "main" }))
        .send()
        .await?;
    assert_eq!(second.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn setup_rejects_unrelated_repository() -> Result<()> {
    let server = start(&[("src/main.c", "int main() { return 0; }\n")]).await?;

    let res = server.post("/api/admin/setup", json!({ "repoUrl": REPO })).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(!server.data_path().exists());
    Ok(())
}

#[tokio::test]
async fn setup_accepts_portfolio_repository() -> Result<()> {
    let server = start(&[
        ("config.json", r#"{ "name": "My portfolio" }"#),
        ("README.md", "# My portfolio\n"),
        (
            "languages/info.json",
            r##"{ "name": "Languages", "description": "Spoken", "color": "#aabbcc" }"##,
        ),
    ])
    .await?;

    let res = server.post("/api/admin/setup", json!({ "repoUrl": REPO })).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = server.get("/api/config").send().await?.json().await?;
    assert_eq!(body["data"]["name"], "My portfolio");

    let body: Value = server.get("/api/group").send().await?.json().await?;
    assert_eq!(body["data"]["groups"], json!(["languages"]));

    let body: Value = server.get("/api/group/languages/info").send().await?.json().await?;
    assert_eq!(body["data"]["filterGroups"], json!([]));
    assert_eq!(body["data"]["associations"], json!([]));
    Ok(())
}

#[tokio::test]
async fn first_run_clones_given_repository() -> Result<()> {
    let server = start(&[("config.json", r#"{ "name": "Cloned" }"#)]).await?;

    let res = server
        .post("/api/admin/firstrun", json!({ "repoUrl": REPO }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = server.get("/api/config").send().await?.json().await?;
    assert_eq!(body["data"]["name"], "Cloned");
    Ok(())
}

#[tokio::test]
async fn first_run_after_setup_provisions_credentials() -> Result<()> {
    let server = start(&[("config.json", r#"{ "name": "Set up first" }"#)]).await?;

    let res = server.post("/api/admin/setup", json!({ "repoUrl": REPO })).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    // No administrator exists yet
    let res = server.login("admin", "anything").await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let admin = server.first_run().await?;
    let res = server.login(&admin.username, &admin.password).await?;
    assert_eq!(res.status(), StatusCode::OK);

    // The cloned data is kept
    let body: Value = server.get("/api/config").send().await?.json().await?;
    assert_eq!(body["data"]["name"], "Set up first");

    let res = server.post("/api/admin/firstrun", json!({})).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn failed_clone_leaves_server_uninitialized() -> Result<()> {
    let server =
        TestServer::start_with(FakeCloner::failing("repository not found"), Duration::ZERO).await?;

    let res = server.post("/api/admin/setup", json!({ "repoUrl": REPO })).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(!server.data_path().exists());

    let body: Value = server.get("/health").send().await?.json().await?;
    assert_eq!(body["data"]["initialized"], false);
    Ok(())
}
