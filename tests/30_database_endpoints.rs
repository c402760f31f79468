mod common;

use anyhow::Result;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

async fn call(method: Method, path: &str, body: Option<Value>) -> Result<(StatusCode, Value)> {
    let server = common::ensure_server().await?;
    let mut req = reqwest::Client::new().request(method, format!("{}{}", server.base_url, path));
    if let Some(body) = body {
        req = req.json(&body);
    }
    let res = req.send().await?;
    let status = res.status();
    Ok((status, res.json::<Value>().await?))
}

#[tokio::test]
async fn database_endpoints_are_unavailable_without_database() -> Result<()> {
    let cases = [
        (Method::GET, "/api/labels", None),
        (Method::POST, "/api/labels", Some(json!({"name": "Bug", "color": "red"}))),
        (Method::GET, "/api/issues/1", None),
        (Method::PATCH, "/api/issues/1/status", Some(json!({"status": "DONE"}))),
        (Method::GET, "/api/issues/1/labels", None),
        (Method::POST, "/api/issues/1/labels", Some(json!({"label_id": 2}))),
        (Method::PUT, "/api/issues/1/labels", Some(json!({"label_ids": [1, 2]}))),
        (Method::DELETE, "/api/issues/1/labels/2", None),
        (Method::POST, "/api/workspaces", Some(json!({"name": "Acme", "owner_id": 1}))),
        (Method::GET, "/api/workspaces/acme", None),
        (Method::GET, "/api/workspaces/acme/projects", None),
        (Method::POST, "/api/workspaces/acme/projects", Some(json!({"title": "Roadmap"}))),
        (Method::GET, "/api/projects/1/issues?page=2", None),
        (Method::GET, "/api/projects/1/discussions", None),
        (
            Method::POST,
            "/api/projects/1/discussions",
            Some(json!({"title": "Roadmap", "content": "Next steps", "author_id": 1})),
        ),
    ];

    for (method, path, body) in cases {
        let label = format!("{} {}", method, path);
        let (status, body) = call(method, path, body).await?;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{}: {}", label, body);
        assert_eq!(body["code"], "SERVICE_UNAVAILABLE", "{}", label);
    }

    Ok(())
}

#[tokio::test]
async fn bad_input_is_rejected_before_database_access() -> Result<()> {
    let (status, body) = call(Method::PATCH, "/api/issues/1/status", Some(json!({"status": "FINISHED"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["code"], "INVALID_JSON");

    let (status, body) = call(Method::GET, "/api/projects/1/issues?page=abc", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, body) = call(Method::PUT, "/api/issues/1/labels", Some(json!({"labels": [1]}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);

    let (status, body) = call(Method::POST, "/api/projects/1/discussions", Some(json!({"title": "Roadmap"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["code"], "INVALID_JSON");

    Ok(())
}
