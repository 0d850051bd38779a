mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, elderly_body};
use oacare_core::models::user::Role;
use serde_json::json;

#[tokio::test]
async fn elderly_lifecycle() {
    let app = TestApp::new();
    let token = app.token(Role::User);

    let mut body = elderly_body("  Somsri Jaidee ", Some("1103700012345"), "1950-03-01", "female");
    body["latitude"] = json!(15.0);
    body["longitude"] = json!(103.1);
    let res = app.post("/elderly", &token, body).await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    assert_eq!(res.body["id"], "ELD001");
    assert_eq!(res.body["name"], "Somsri Jaidee");
    assert_eq!(res.body["registeredBy"], "USR903");
    assert_eq!(res.body["location"]["latitude"], 15.0);

    let res = app.get("/elderly/exists?citizenID=1103700012345", &token).await;
    assert_eq!(res.body["exists"], true);
    assert_eq!(res.body["elderlyID"], "ELD001");

    let res = app.get("/elderly/exists?name=somsri%20jaidee", &token).await;
    assert_eq!(res.body["exists"], true);

    let res = app.get("/elderly/exists", &token).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let duplicate = elderly_body("Other", Some("1103700012345"), "1951-01-01", "male");
    let res = app.post("/elderly", &token, duplicate).await;
    assert_eq!(res.status, StatusCode::CONFLICT);

    let res = app
        .send(
            Method::PUT,
            "/elderly/eld001",
            Some(&token),
            Some(elderly_body("Somsri Jaidee", Some("1103700012345"), "1950-03-01", "female")),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert!(res.body["location"].is_null());

    let res = app.send(Method::DELETE, "/elderly/ELD001", Some(&token), None).await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert_eq!(app.get("/elderly/ELD001", &token).await.status, StatusCode::NOT_FOUND);

    let res = app.get("/elderly/exists?citizenID=1103700012345", &token).await;
    assert_eq!(res.body["exists"], false);

    let res = app
        .post("/elderly", &token, elderly_body("Somsri", Some("1103700012345"), "1950-03-01", "female"))
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["id"], "ELD002");
}

#[tokio::test]
async fn elderly_input_is_validated() {
    let app = TestApp::new();
    let token = app.token(Role::User);

    let mut missing_street = elderly_body("Somsri", None, "1950-03-01", "female");
    missing_street["address"]["street"] = json!("  ");
    let mut half_coordinate = elderly_body("Somsri", None, "1950-03-01", "female");
    half_coordinate["latitude"] = json!(15.0);
    let mut bad_latitude = elderly_body("Somsri", None, "1950-03-01", "female");
    bad_latitude["latitude"] = json!(95.0);
    bad_latitude["longitude"] = json!(103.0);

    for body in [
        elderly_body("   ", None, "1950-03-01", "female"),
        elderly_body("Somsri", Some("12345"), "1950-03-01", "female"),
        elderly_body("Somsri", None, "not-a-date", "female"),
        missing_street,
        half_coordinate,
        bad_latitude,
    ] {
        let res = app.post("/elderly", &token, body.clone()).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "{body}");
        assert!(res.body["error"].is_string());
    }

    assert_eq!(app.get("/elderly/PATIENT1", &token).await.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.get("/elderly/ELD001", &token).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_pages_over_active_records() {
    let app = TestApp::new();
    let token = app.token(Role::User);
    for i in 1..=12 {
        let mut body = elderly_body(&format!("Person {i}"), None, "1950-01-01", "male");
        if i % 2 == 0 {
            body["address"]["province"] = json!("Surin");
        }
        app.create_elderly(&token, body).await;
    }

    let res = app.get("/elderly?search=surin&pageSize=4&page=2", &token).await;
    assert_eq!(res.body["total"], 6);
    assert_eq!(res.body["totalPages"], 2);
    let ids: Vec<&str> = res.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["ELD010", "ELD012"]);

    let res = app.get("/elderly?page=0&pageSize=500", &token).await;
    assert_eq!(res.body["page"], 1);
    assert_eq!(res.body["pageSize"], 100);
    assert_eq!(res.body["total"], 12);
}

#[tokio::test]
async fn hard_delete_is_reserved_for_admins() {
    let app = TestApp::new();
    let user = app.token(Role::User);
    let admin = app.token(Role::Admin);
    let id = app
        .create_elderly(&user, elderly_body("Somchai", None, "1948-01-01", "male"))
        .await;

    let uri = format!("/elderly/{id}?hard=true");
    let res = app.send(Method::DELETE, &uri, Some(&user), None).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app.send(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    let res = app.send(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_info_reads_for_members_writes_for_admins() {
    let app = TestApp::new();
    let user = app.token(Role::User);
    let admin = app.token(Role::Admin);
    let article = json!({ "title": " Knee care ", "content": "Keep moving." });

    let res = app.post("/healthinfo", &user, article.clone()).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app.post("/healthinfo", &admin, article).await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    assert_eq!(res.body["title"], "Knee care");
    let id = res.body["id"].as_str().unwrap().to_string();

    let res = app.get("/healthinfo", &user).await;
    assert_eq!(res.body.as_array().unwrap().len(), 1);
    assert_eq!(app.get(&format!("/healthinfo/{id}"), &user).await.status, StatusCode::OK);

    let res = app
        .send(
            Method::PUT,
            &format!("/healthinfo/{id}"),
            Some(&admin),
            Some(json!({ "title": "Knee care", "content": "Walk daily." })),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["content"], "Walk daily.");

    let res = app.post("/healthinfo", &admin, json!({ "title": "Empty" })).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.get("/healthinfo/not-a-uuid", &user).await.status, StatusCode::BAD_REQUEST);

    let res = app
        .send(Method::DELETE, &format!("/healthinfo/{id}"), Some(&admin), None)
        .await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert_eq!(app.get(&format!("/healthinfo/{id}"), &user).await.status, StatusCode::NOT_FOUND);
}
