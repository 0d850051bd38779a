mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, elderly_body};
use oacare_core::models::user::Role;
use serde_json::json;

const URI: &str = "/reports/analysis_results";

/// Two people; the first screened once with a recorded result. Returns the
/// elderly ids and the result id.
async fn seed(app: &TestApp) -> (String, String, String) {
    let user = app.token(Role::User);
    let mut first = elderly_body("Somsri", Some("3310100456789"), "1950-03-01", "female");
    first["latitude"] = json!(15.1);
    first["longitude"] = json!(103.2);
    let first = app.create_elderly(&user, first).await;
    let second = app
        .create_elderly(&user, elderly_body("Somchai", None, "1948-01-01", "male"))
        .await;

    let res = app
        .post(
            "/assessment",
            &user,
            json!({ "elderlyID": first, "stiffness": true, "crepitus": true }),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    let res = app
        .post(
            "/assessment_results",
            &user,
            json!({
                "assessmentID": "ASM001",
                "elderlyID": first,
                "as_score": 2,
                "as_results": "follow up"
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    let result_id = res.body["as_resultsID"].as_str().unwrap().to_string();

    (first, second, result_id)
}

#[tokio::test]
async fn executives_record_analyses_against_results() {
    let app = TestApp::new();
    let (first, second, result_id) = seed(&app).await;
    let executive = app.token(Role::Executive);
    let user = app.token(Role::User);

    let body = json!({
        "elderlyID": first,
        "as_resultsID": result_id,
        "an_results": "  refer to ortho  "
    });
    assert_eq!(app.post(URI, &user, body.clone()).await.status, StatusCode::FORBIDDEN);

    let res = app.post(URI, &executive, body).await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    assert_eq!(res.body["recordID"], "ANR001");
    assert_eq!(res.body["executiveID"], "USR902");
    assert_eq!(res.body["as_resultsID"], result_id.as_str());
    assert_eq!(res.body["an_results"], "refer to ortho");

    let cases = [
        (
            json!({ "elderlyID": second, "as_resultsID": result_id, "an_results": "x" }),
            StatusCode::CONFLICT,
        ),
        (
            json!({
                "elderlyID": first,
                "as_resultsID": "00000000-0000-4000-8000-000000000000",
                "an_results": "x"
            }),
            StatusCode::NOT_FOUND,
        ),
        (json!({ "elderlyID": "ELD404", "an_results": "x" }), StatusCode::NOT_FOUND),
        (
            json!({ "elderlyID": first, "as_resultsID": "not-a-uuid", "an_results": "x" }),
            StatusCode::BAD_REQUEST,
        ),
        (json!({ "elderlyID": first, "an_results": "   " }), StatusCode::BAD_REQUEST),
        (json!({ "an_results": "x" }), StatusCode::BAD_REQUEST),
    ];
    for (body, expected) in cases {
        let res = app.post(URI, &executive, body.clone()).await;
        assert_eq!(res.status, expected, "{body}");
    }
}

#[tokio::test]
async fn report_joins_people_and_searches_both_sides() {
    let app = TestApp::new();
    let (first, second, result_id) = seed(&app).await;
    let executive = app.token(Role::Executive);
    let admin = app.token(Role::Admin);

    app.post(
        URI,
        &executive,
        json!({ "elderlyID": first, "as_resultsID": result_id, "an_results": "refer to ortho" }),
    )
    .await;
    app.post(URI, &admin, json!({ "elderlyID": second, "an_results": "walk daily" }))
        .await;

    assert_eq!(app.get(URI, &app.token(Role::User)).await.status, StatusCode::FORBIDDEN);

    let res = app.get(URI, &executive).await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.body["total"], 2);
    assert_eq!(res.body["pageSize"], 20);
    assert_eq!(res.body["data"][0]["recordID"], "ANR002");
    assert_eq!(res.body["data"][0]["executiveID"], "USR901");
    let row = &res.body["data"][1];
    assert_eq!(row["recordID"], "ANR001");
    assert_eq!(row["name"], "Somsri");
    assert_eq!(row["citizenID"], "3310100456789");
    assert_eq!(row["phone"], "0812345678");
    assert_eq!(row["address"]["province"], "Buriram");
    assert_eq!(row["latitude"], 15.1);
    assert_eq!(row["longitude"], 103.2);

    let searches = [
        ("ORTHO", "ANR001"),
        ("3310100456789", "ANR001"),
        ("anr002", "ANR002"),
        ("somchai", "ANR002"),
    ];
    for (search, expected) in searches {
        let res = app.get(&format!("{URI}?search={search}"), &executive).await;
        assert_eq!(res.body["total"], 1, "{search}");
        assert_eq!(res.body["data"][0]["recordID"], expected, "{search}");
    }

    let res = app.get(&format!("{URI}?pageSize=1&page=2"), &executive).await;
    assert_eq!(res.body["data"][0]["recordID"], "ANR001");
    assert_eq!(res.body["totalPages"], 2);

    let res = app.get(&format!("{URI}?from=2000-01-01&to=2000-12-31"), &executive).await;
    assert_eq!(res.body["total"], 0);
    let res = app.get(&format!("{URI}?from=yesterday"), &executive).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .send(Method::DELETE, &format!("/elderly/{second}"), Some(&admin), None)
        .await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    let res = app.get(URI, &executive).await;
    assert_eq!(res.body["total"], 2);
    assert_eq!(res.body["data"][0]["recordID"], "ANR002");
    assert!(res.body["data"][0]["name"].is_null());
}
