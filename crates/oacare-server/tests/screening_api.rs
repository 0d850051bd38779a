mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, elderly_body};
use oacare_core::models::user::Role;
use oacare_scoring::screening::{NEGATIVE_RESULT, POSITIVE_RESULT};
use serde_json::json;

#[tokio::test]
async fn health_needs_no_session() {
    let app = TestApp::new();
    let res = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "ok");
}

#[tokio::test]
async fn screening_requires_a_session() {
    let app = TestApp::new();
    let res = app
        .send(Method::POST, "/assessment", None, Some(json!({ "elderlyID": "ELD001" })))
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(res.body["error"].is_string());

    let res = app
        .send(Method::POST, "/assessment", Some("garbage"), Some(json!({ "elderlyID": "ELD001" })))
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_citizen_then_screening_without_elderly_id_is_rejected() {
    let app = TestApp::new();
    let token = app.token(Role::User);

    let res = app.get("/elderly/exists?citizenID=1234567890123", &token).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({ "exists": false }));

    let res = app
        .post("/assessment", &token, json!({ "stiffness": true, "crepitus": true }))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["error"].as_str().unwrap().contains("elderlyID"));
}

#[tokio::test]
async fn screening_unknown_elderly_is_not_found() {
    let app = TestApp::new();
    let token = app.token(Role::User);
    let res = app.post("/assessment", &token, json!({ "elderlyID": "ELD404" })).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn write_time_screening_survives_the_round_trip() {
    let app = TestApp::new();
    let token = app.token(Role::User);
    let elderly_id = app
        .create_elderly(&token, elderly_body("Somsri", None, "1950-03-01", "female"))
        .await;

    let res = app
        .post(
            "/assessment",
            &token,
            json!({
                "elderlyID": elderly_id.to_lowercase(),
                "stiffness": true,
                "crepitus": "1",
                "bonyTenderness": "ใช่",
                "bonyEnlargement": 0,
                "noWarmth": "no"
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    assert_eq!(res.body["ok"], true);
    assert_eq!(res.body["assessmentID"], "ASM001");
    assert_eq!(res.body["yesCount"], 3);
    assert_eq!(res.body["resultText"], POSITIVE_RESULT);

    let res = app.get("/assessment_results/asm001", &token).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["assessmentID"], "ASM001");
    assert_eq!(res.body["elderlyID"], elderly_id.as_str());
    assert_eq!(res.body["elderlyName"], "Somsri");
    assert_eq!(res.body["yesCount"], 3);
    assert_eq!(res.body["resultText"], POSITIVE_RESULT);
    assert_eq!(res.body["score"], 3);

    let res = app
        .post(
            "/assessment_results",
            &token,
            json!({
                "assessmentID": "ASM001",
                "elderlyID": elderly_id,
                "as_score": "4",
                "as_results": "  refer to physiotherapy  "
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["assessmentID"], "ASM001");
    assert!(res.body["as_resultsID"].is_string());

    let res = app.get("/assessment_results/ASM001", &token).await;
    assert_eq!(res.body["score"], 4);
    assert_eq!(res.body["yesCount"], 3);
    assert_eq!(res.body["resultText"], POSITIVE_RESULT);
}

#[tokio::test]
async fn missing_answers_count_as_no() {
    let app = TestApp::new();
    let token = app.token(Role::User);
    let elderly_id = app
        .create_elderly(&token, elderly_body("Somchai", None, "1948-01-01", "male"))
        .await;

    let res = app
        .post("/assessment", &token, json!({ "elderlyID": elderly_id, "stiffness": true }))
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["yesCount"], 1);
    assert_eq!(res.body["resultText"], NEGATIVE_RESULT);
}

#[tokio::test]
async fn result_validation() {
    let app = TestApp::new();
    let token = app.token(Role::User);
    let elderly_id = app
        .create_elderly(&token, elderly_body("Somsri", None, "1950-03-01", "female"))
        .await;
    app.post("/assessment", &token, json!({ "elderlyID": elderly_id })).await;

    let cases = [
        (json!({ "elderlyID": elderly_id, "as_score": 3, "as_results": "x" }), StatusCode::BAD_REQUEST),
        (json!({ "assessmentID": "ASM001", "as_score": 3, "as_results": "x" }), StatusCode::BAD_REQUEST),
        (json!({ "assessmentID": "ASM001", "elderlyID": elderly_id, "as_results": "x" }), StatusCode::BAD_REQUEST),
        (json!({ "assessmentID": "ASM001", "elderlyID": elderly_id, "as_score": 9, "as_results": "x" }), StatusCode::BAD_REQUEST),
        (json!({ "assessmentID": "ASM001", "elderlyID": elderly_id, "as_score": 2, "as_results": "   " }), StatusCode::BAD_REQUEST),
        (json!({ "assessmentID": "ASM777", "elderlyID": elderly_id, "as_score": 2, "as_results": "x" }), StatusCode::NOT_FOUND),
        (json!({ "assessmentID": "ASM001", "elderlyID": "ELD999", "as_score": 2, "as_results": "x" }), StatusCode::CONFLICT),
    ];
    for (body, expected) in cases {
        let res = app.post("/assessment_results", &token, body.clone()).await;
        assert_eq!(res.status, expected, "{body}");
    }
}

#[tokio::test]
async fn assessment_list_joins_names_and_pages() {
    let app = TestApp::new();
    let token = app.token(Role::User);
    let first = app
        .create_elderly(&token, elderly_body("Somsri", None, "1950-03-01", "female"))
        .await;
    let second = app
        .create_elderly(&token, elderly_body("Somchai", None, "1948-01-01", "male"))
        .await;
    for (id, date) in [(&first, "2024-01-10"), (&second, "2024-02-10"), (&first, "2024-03-10")] {
        let res = app
            .post("/assessment", &token, json!({ "elderlyID": id, "assessmentDate": date }))
            .await;
        assert_eq!(res.status, StatusCode::CREATED);
    }

    let res = app.get("/assessment?pageSize=2", &token).await;
    assert_eq!(res.body["total"], 3);
    assert_eq!(res.body["totalPages"], 2);
    assert_eq!(res.body["data"][0]["assessmentID"], "ASM003");
    assert_eq!(res.body["data"][0]["elderlyName"], "Somsri");
    assert_eq!(res.body["data"][1]["elderlyName"], "Somchai");

    let res = app.get(&format!("/assessment?elderlyID={first}"), &token).await;
    assert_eq!(res.body["total"], 2);

    let res = app.get("/assessment?elderlyID=nope", &token).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = TestApp::new();
    let token = app.token(Role::User);
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/assessment")
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let res = app.call(request).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["error"].is_string());
}
