mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{Factory, TestApp};

#[tokio::test]
async fn test_create_team() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app);
    let author = factory.create_user(false).await;
    let mate = factory.create_user(false).await;
    let company = factory.create_company("Acme").await;

    let response = app
        .server
        .post(&format!("/api/companies/{}/teams", company.id))
        .add_header("Authorization", author.auth_header())
        .json(&json!({
            "name": "Core",
            "description": "Platform team",
            "teammates": [{ "id": mate.user_id }]
        }))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert!(body["id"].as_i64().is_some());
    assert_eq!(body["name"].as_str(), Some("Core"));
    assert_eq!(body["company_id"].as_i64(), Some(company.id));
    assert_eq!(body["author_id"].as_i64(), Some(author.user_id));
    assert_eq!(body["teammates"][0]["id"].as_i64(), Some(mate.user_id));
    assert!(body["teammates"][0].get("password_hash").is_none());
}

#[tokio::test]
async fn test_create_team_unknown_company() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app);
    let author = factory.create_user(false).await;

    let response = app
        .server
        .post("/api/companies/555/teams")
        .add_header("Authorization", author.auth_header())
        .json(&json!({ "name": "Core" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_team_teammate_without_id() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app);
    let author = factory.create_user(false).await;
    let company = factory.create_company("Acme").await;

    let response = app
        .server
        .post(&format!("/api/companies/{}/teams", company.id))
        .add_header("Authorization", author.auth_header())
        .json(&json!({ "name": "Core", "teammates": [{}] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_teams_with_filters() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app);
    let author = factory.create_user(false).await;
    let other = factory.create_user(false).await;
    let acme = factory.create_company("Acme").await;
    let globex = factory.create_company("Globex").await;

    factory.create_team(acme.id, author.user_id, "A").await;
    factory.create_team(acme.id, other.user_id, "B").await;
    factory.create_team(globex.id, author.user_id, "C").await;

    let all: serde_json::Value = app
        .server
        .get("/api/teams")
        .add_header("Authorization", author.auth_header())
        .await
        .json();
    assert_eq!(all.as_array().unwrap().len(), 3);

    let acme_teams: serde_json::Value = app
        .server
        .get(&format!("/api/teams?company_id={}", acme.id))
        .add_header("Authorization", author.auth_header())
        .await
        .json();
    assert_eq!(acme_teams.as_array().unwrap().len(), 2);

    let mine_at_acme: serde_json::Value = app
        .server
        .get(&format!(
            "/api/teams?company_id={}&user_id={}",
            acme.id, author.user_id
        ))
        .add_header("Authorization", author.auth_header())
        .await
        .json();
    let names: Vec<&str> = mine_at_acme
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["A"]);

    let via_company: serde_json::Value = app
        .server
        .get(&format!("/api/companies/{}/teams", globex.id))
        .add_header("Authorization", author.auth_header())
        .await
        .json();
    assert_eq!(via_company[0]["name"].as_str(), Some("C"));
}

#[tokio::test]
async fn test_get_team_not_found() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app);
    let auth = factory.create_user(false).await;

    let response = app
        .server
        .get("/api/teams/31337")
        .add_header("Authorization", auth.auth_header())
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert!(body["details"].as_str().unwrap().contains("31337"));
}

#[tokio::test]
async fn test_delete_team_returns_prior_state_and_soft_deletes_projects() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app);
    let h = factory.create_hierarchy().await;

    let project: serde_json::Value = app
        .server
        .post("/api/projects")
        .add_header("Authorization", h.admin.auth_header())
        .json(&json!({
            "user": { "id": h.admin.user_id },
            "project": { "name": "X", "team": { "id": h.team.id } }
        }))
        .await
        .json();
    let project_id = project["id"].as_i64().unwrap();

    let response = app
        .server
        .delete(&format!("/api/teams/{}", h.team.id))
        .add_header("Authorization", h.admin.auth_header())
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["id"].as_i64(), Some(h.team.id));
    assert_eq!(body["projects"][0].as_i64(), Some(project_id));

    app.server
        .get(&format!("/api/teams/{}", h.team.id))
        .add_header("Authorization", h.admin.auth_header())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    app.server
        .get(&format!("/api/projects/{}", project_id))
        .add_header("Authorization", h.admin.auth_header())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    app.server
        .delete(&format!("/api/teams/{}", h.team.id))
        .add_header("Authorization", h.admin.auth_header())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
