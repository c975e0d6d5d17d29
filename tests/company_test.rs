mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{Factory, TestApp};

#[tokio::test]
async fn test_admin_creates_company() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app);
    let admin = factory.create_user(true).await;

    let response = app
        .server
        .post("/api/companies")
        .add_header("Authorization", admin.auth_header())
        .json(&json!({ "name": "Initech", "description": "Software" }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    let id = body["id"].as_i64().unwrap();

    let fetched: serde_json::Value = app
        .server
        .get(&format!("/api/companies/{}", id))
        .add_header("Authorization", admin.auth_header())
        .await
        .json();
    assert_eq!(fetched["name"].as_str(), Some("Initech"));

    let listed: serde_json::Value = app
        .server
        .get("/api/companies")
        .add_header("Authorization", admin.auth_header())
        .await
        .json();
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_non_admin_cannot_create_company() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app);
    let user = factory.create_user(false).await;

    app.server
        .post("/api/companies")
        .add_header("Authorization", user.auth_header())
        .json(&json!({ "name": "Initech" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_blank_company_name_bad_request() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app);
    let admin = factory.create_user(true).await;

    app.server
        .post("/api/companies")
        .add_header("Authorization", admin.auth_header())
        .json(&json!({ "name": "   " }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_company_not_found() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app);
    let user = factory.create_user(false).await;

    app.server
        .get("/api/companies/12")
        .add_header("Authorization", user.auth_header())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
