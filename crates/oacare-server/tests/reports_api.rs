mod common;

use axum::http::StatusCode;
use common::{TestApp, elderly_body};
use oacare_core::models::user::Role;
use oacare_scoring::reporting::RiskLevel;
use serde_json::{Value, json};

async fn screen(app: &TestApp, token: &str, elderly_id: &str, date: &str, yes: usize) {
    let mut body = json!({ "elderlyID": elderly_id, "assessmentDate": date });
    for field in ["stiffness", "crepitus", "bonyTenderness", "bonyEnlargement", "noWarmth"]
        .into_iter()
        .take(yes)
    {
        body[field] = json!(true);
    }
    let res = app.post("/assessment", token, body).await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
}

fn at(mut body: Value, latitude: f64, longitude: f64) -> Value {
    body["latitude"] = json!(latitude);
    body["longitude"] = json!(longitude);
    body
}

#[tokio::test]
async fn knee_oa_bands_by_age_on_assessment_date() {
    let app = TestApp::new();
    let user = app.token(Role::User);
    let executive = app.token(Role::Executive);

    let woman = app
        .create_elderly(&user, elderly_body("Somsri", None, "1950-03-01", "female"))
        .await;
    let man = app
        .create_elderly(&user, elderly_body("Somchai", None, "1940-01-01", "male"))
        .await;
    screen(&app, &user, &woman, "2024-06-01", 3).await;
    screen(&app, &user, &man, "2024-06-01", 1).await;
    screen(&app, &user, &man, "2022-06-01", 1).await;

    let res = app
        .get("/reports/knee_oa?start=2024-01-01&end=2024-12-31", &executive)
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.body["bands"], json!(["60-69", "70-79", "80+"]));
    assert_eq!(res.body["byGender"]["female"]["70-79"], 1);
    assert_eq!(res.body["byGender"]["male"]["80+"], 1);
    assert_eq!(res.body["byGender"]["unknown"]["60-69"], 0);
    assert_eq!(res.body["grandTotal"], 2);

    let res = app.get("/reports/knee_oa", &executive).await;
    assert_eq!(res.body["grandTotal"], 3);

    let res = app.get("/reports/knee_oa?start=June", &executive).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn aggregate_reports_skip_deleted_people() {
    let app = TestApp::new();
    let user = app.token(Role::User);
    let admin = app.token(Role::Admin);
    let id = app
        .create_elderly(&user, elderly_body("Somsri", None, "1950-03-01", "female"))
        .await;
    screen(&app, &user, &id, "2024-06-01", 4).await;

    let res = app.get("/reports/trend", &admin).await;
    assert_eq!(res.body["series"], json!([{ "year": 2024, "count": 1 }]));

    let res = app
        .send(axum::http::Method::DELETE, &format!("/elderly/{id}"), Some(&user), None)
        .await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    let res = app.get("/reports/knee_oa", &admin).await;
    assert_eq!(res.body["grandTotal"], 0);
    let res = app.get("/reports/trend", &admin).await;
    assert_eq!(res.body["series"], json!([]));
}

#[tokio::test]
async fn yearly_trend_with_year_filter() {
    let app = TestApp::new();
    let user = app.token(Role::User);
    let admin = app.token(Role::Admin);
    let id = app
        .create_elderly(&user, elderly_body("Somsri", None, "1950-03-01", "female"))
        .await;
    screen(&app, &user, &id, "2023-02-01", 4).await;
    screen(&app, &user, &id, "2024-02-01", 0).await;
    screen(&app, &user, &id, "2024-08-01", 5).await;

    let res = app.get("/reports/trend", &admin).await;
    assert_eq!(
        res.body["series"],
        json!([{ "year": 2023, "count": 1 }, { "year": 2024, "count": 2 }])
    );

    let res = app.get("/reports/trend?startYear=2024", &admin).await;
    assert_eq!(res.body["series"], json!([{ "year": 2024, "count": 2 }]));
    assert_eq!(res.body["filter"]["startYear"], 2024);
    assert!(res.body["filter"]["endYear"].is_null());

    let res = app.get("/reports/trend?endYear=last", &admin).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn travel_decisions_against_the_facility() {
    let app = TestApp::new();
    let user = app.token(Role::User);
    let executive = app.token(Role::Executive);

    let far = app
        .create_elderly(&user, at(elderly_body("Far", None, "1950-01-01", "male"), 15.23, 103.1039))
        .await;
    let near = app
        .create_elderly(&user, at(elderly_body("Near", None, "1950-01-01", "female"), 14.9948, 103.1039))
        .await;
    let unknown = app
        .create_elderly(&user, elderly_body("Nowhere", None, "1950-01-01", "female"))
        .await;
    screen(&app, &user, &far, "2024-01-01", 0).await;

    let res = app.get("/reports/travel", &executive).await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.body["facility"]["latitude"], 14.9948);
    assert_eq!(res.body["thresholds"]["forcePickupKm"], 20.0);

    let rows = res.body["data"].as_array().unwrap();
    let ids: Vec<&str> = rows.iter().map(|r| r["elderlyID"].as_str().unwrap()).collect();
    assert_eq!(ids, [unknown.as_str(), near.as_str(), far.as_str()]);

    assert_eq!(rows[0]["decision"], "needs verification");
    assert!(rows[0]["distanceKm"].is_null());
    assert_eq!(rows[1]["decision"], "self-transport");
    assert_eq!(rows[1]["yesCount"], 0);
    assert_eq!(rows[2]["decision"], "facility pickup required");
    assert_eq!(rows[2]["severity"], "mild/none");
    let distance = rows[2]["distanceKm"].as_f64().unwrap();
    assert!((26.0..26.5).contains(&distance), "{distance}");
    assert_eq!(rows[2]["latestAssessment"]["assessmentID"], "ASM001");

    let res = app
        .get("/reports/travel?hospitalLat=15.23&hospitalLng=103.1039&search=far", &executive)
        .await;
    let rows = res.body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["decision"], "self-transport");

    let res = app.get("/reports/travel?forcePickupKm=-1", &executive).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn maps_list_newest_registration_first() {
    let app = TestApp::new();
    let user = app.token(Role::User);
    let admin = app.token(Role::Admin);
    for name in ["A", "B", "C"] {
        app.create_elderly(&user, at(elderly_body(name, None, "1950-01-01", "male"), 15.0, 103.0))
            .await;
    }

    let res = app.get("/reports/maps_oa?pageSize=2", &admin).await;
    assert_eq!(res.body["total"], 3);
    assert_eq!(res.body["data"][0]["elderlyID"], "ELD003");
    assert_eq!(res.body["data"][0]["latitude"], 15.0);
    assert!(res.body["data"][0]["latestAssessment"].is_null());
}

#[tokio::test]
async fn risk_list_uses_each_persons_latest_assessment() {
    let app = TestApp::new();
    let user = app.token(Role::User);
    let executive = app.token(Role::Executive);

    let moderate = app
        .create_elderly(&user, elderly_body("Moderate", None, "1950-01-01", "female"))
        .await;
    let recovered = app
        .create_elderly(&user, elderly_body("Recovered", None, "1950-01-01", "male"))
        .await;
    let clear = app
        .create_elderly(&user, elderly_body("Clear", None, "1950-01-01", "male"))
        .await;

    screen(&app, &user, &moderate, "2024-03-01", 3).await;
    screen(&app, &user, &recovered, "2024-01-01", 4).await;
    screen(&app, &user, &recovered, "2024-04-01", 1).await;
    screen(&app, &user, &clear, "2024-05-01", 5).await;

    let res = app.get("/executive/oa_risk/list", &executive).await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.body["total"], 2);
    assert_eq!(res.body["data"][0]["elderlyID"], clear.as_str());
    assert_eq!(res.body["data"][0]["riskLabel"], "clear indication");
    assert_eq!(res.body["data"][1]["elderlyID"], moderate.as_str());
    assert_eq!(res.body["data"][1]["riskLabel"], "moderate risk");

    // Only January is in range, where the since-recovered person was high risk.
    let res = app
        .get("/executive/oa_risk/list?start=2024-01-01&end=2024-01-31", &executive)
        .await;
    assert_eq!(res.body["total"], 1);
    assert_eq!(res.body["data"][0]["elderlyID"], recovered.as_str());
    assert_eq!(res.body["data"][0]["yesCount"], 4);
    assert_eq!(res.body["range"]["start"], "2024-01-01");
}

#[tokio::test]
async fn risk_detail_gives_advice_and_timeline() {
    let app = TestApp::new();
    let user = app.token(Role::User);
    let executive = app.token(Role::Executive);
    let id = app
        .create_elderly(&user, elderly_body("Somsri", None, "1950-03-01", "female"))
        .await;

    let res = app.get(&format!("/executive/oa_risk/{id}"), &executive).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body["latest"].is_null());
    assert_eq!(res.body["advice"], "no assessment yet");

    screen(&app, &user, &id, "2023-05-01", 2).await;
    screen(&app, &user, &id, "2024-05-01", 3).await;

    let res = app.get(&format!("/executive/oa_risk/{id}"), &executive).await;
    assert_eq!(res.body["profile"]["name"], "Somsri");
    assert_eq!(res.body["profile"]["address"], "12 Moo 3 Nai Mueang Mueang Buriram");
    assert_eq!(res.body["latest"]["assessmentID"], "ASM002");
    assert_eq!(res.body["advice"], RiskLevel::Moderate.advice());
    let timeline = res.body["timeline"].as_array().unwrap();
    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline[1]["riskLabel"], "low risk");

    let res = app.get("/executive/oa_risk/ELD999", &executive).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn map_lookup_by_citizen_id() {
    let app = TestApp::new();
    let user = app.token(Role::User);
    let executive = app.token(Role::Executive);
    app.create_elderly(
        &user,
        at(elderly_body("Somsri", Some("3310100456789"), "1950-03-01", "female"), 15.1, 103.2),
    )
    .await;

    let res = app.get("/executive/map?citizen=3310100456789", &executive).await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.body["name"], "Somsri");
    assert_eq!(res.body["latitude"], 15.1);
    assert_eq!(res.body["longitude"], 103.2);
    assert!(res.body["latlong"].is_string());

    assert_eq!(app.get("/executive/map", &executive).await.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        app.get("/executive/map?citizen=1111111111111", &executive).await.status,
        StatusCode::NOT_FOUND
    );
}
