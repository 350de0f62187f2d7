mod common;

use actix_web::{http::header, test};
use serde_json::{json, Value};
use serial_test::serial;

use common::TestApp;

async fn post<S>(app: &S, token: &str, uri: &str, body: Option<Value>) -> (u16, Value)
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let mut req = test::TestRequest::post()
        .uri(uri)
        .insert_header((header::AUTHORIZATION, token.to_string()));
    if let Some(body) = body {
        req = req.set_json(body);
    }
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status().as_u16();
    (status, test::read_body_json(resp).await)
}

async fn patch<S>(app: &S, token: &str, uri: &str, body: Value) -> (u16, Value)
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let req = test::TestRequest::patch()
        .uri(uri)
        .insert_header((header::AUTHORIZATION, token.to_string()))
        .set_json(body)
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    (status, test::read_body_json(resp).await)
}

#[actix_rt::test]
#[serial]
async fn test_vehicle_wizard_creates_vehicle() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;
    let token = test_app.employee_token();

    let (status, started) = post(&app, &token, "/api/admin/wizards/vehicle", None).await;
    assert_eq!(status, 201);
    assert_eq!(started["total_steps"], 5);
    assert_eq!(started["progress"], 20);
    assert_eq!(started["can_proceed"], false);
    assert_eq!(started["form"]["available"], true);
    let base = format!("/api/admin/wizards/vehicle/{}", started["id"].as_str().unwrap());

    // the first step is incomplete, so next stays put
    let (_, blocked) = post(&app, &token, &format!("{}/next", base), None).await;
    assert_eq!(blocked["navigation"]["outcome"], "blocked");
    assert_eq!(blocked["navigation"]["step"], "basic");
    assert_eq!(blocked["wizard"]["current_step"], 0);

    let fields = [
        json!({ "make": "Peugeot", "model": "208", "category": "compact" }),
        json!({ "fuel": "petrol", "transmission": "manual", "seats": 5, "daily_rate": 32.0 }),
        json!({ "mileage": 0, "year": 2024, "description": "City car" }),
        json!({ "equipment": ["GPS", "Bluetooth"] }),
    ];
    for (step, patch_body) in fields.into_iter().enumerate() {
        let (status, view) = patch(&app, &token, &base, patch_body).await;
        assert_eq!(status, 200);
        assert_eq!(view["can_proceed"], true, "step {}", step);

        let (_, moved) = post(&app, &token, &format!("{}/next", base), None).await;
        assert_eq!(moved["navigation"]["outcome"], "moved");
        assert_eq!(moved["navigation"]["to"], step + 1);
    }

    let (status, done) = post(&app, &token, &format!("{}/submit", base), None).await;
    assert_eq!(status, 201);
    assert_eq!(done["created"]["make"], "Peugeot");
    assert_eq!(done["created"]["id"], 5);
    assert_eq!(done["wizard"]["status"], "submitted");
    assert_eq!(test_app.state.store.vehicles.count().await.unwrap(), 5);
    assert!(test_app.state.wizards.vehicles.is_empty().await);

    let req = test::TestRequest::get()
        .uri(&base)
        .insert_header((header::AUTHORIZATION, token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_rt::test]
#[serial]
async fn test_late_edit_to_earlier_step_blocks_submit() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;
    let token = test_app.employee_token();

    let (_, started) = post(&app, &token, "/api/admin/wizards/vehicle", None).await;
    let base = format!("/api/admin/wizards/vehicle/{}", started["id"].as_str().unwrap());

    let fields = [
        json!({ "make": "Renault", "model": "Clio", "category": "compact" }),
        json!({ "fuel": "diesel", "transmission": "manual", "seats": 5, "daily_rate": 29.0 }),
        json!({ "mileage": 1200, "year": 2023 }),
        json!({ "equipment": [] }),
    ];
    for patch_body in fields {
        patch(&app, &token, &base, patch_body).await;
        post(&app, &token, &format!("{}/next", base), None).await;
    }

    // on the review step, rewrite the specs the wizard already validated
    let (status, view) = patch(&app, &token, &base, json!({ "daily_rate": -10.0, "seats": 0 })).await;
    assert_eq!(status, 200);
    assert_eq!(view["current_step"], 4);

    let (status, body) = post(&app, &token, &format!("{}/submit", base), None).await;
    assert_eq!(status, 409);
    assert!(body["error"].as_str().unwrap().contains("specs"));
    assert_eq!(test_app.state.store.vehicles.count().await.unwrap(), 4);
    assert_eq!(test_app.state.wizards.vehicles.len().await, 1);

    let (status, _) = patch(&app, &token, &base, json!({ "daily_rate": 30.0, "seats": 5 })).await;
    assert_eq!(status, 200);
    let (status, done) = post(&app, &token, &format!("{}/submit", base), None).await;
    assert_eq!(status, 201);
    assert_eq!(done["created"]["daily_rate"], 30.0);
}

#[actix_rt::test]
#[serial]
async fn test_submit_before_last_step_is_refused() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;
    let token = test_app.admin_token();

    let (_, started) = post(&app, &token, "/api/admin/wizards/agency", None).await;
    let base = format!("/api/admin/wizards/agency/{}", started["id"].as_str().unwrap());

    let (status, body) = post(&app, &token, &format!("{}/submit", base), None).await;
    assert_eq!(status, 409);
    assert!(body["error"].as_str().unwrap().contains("last step"));
}

#[actix_rt::test]
#[serial]
async fn test_back_on_first_step_cancels_session() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;
    let token = test_app.admin_token();

    let (_, started) = post(&app, &token, "/api/admin/wizards/agency", None).await;
    assert_eq!(started["form"]["opening_hours"], "8h-18h Monday to Saturday");
    let base = format!("/api/admin/wizards/agency/{}", started["id"].as_str().unwrap());

    let (_, previous) = post(&app, &token, &format!("{}/previous", base), None).await;
    assert_eq!(previous["navigation"]["outcome"], "at_boundary");
    assert_eq!(previous["wizard"]["status"], "active");

    let (status, back) = post(&app, &token, &format!("{}/back", base), None).await;
    assert_eq!(status, 200);
    assert_eq!(back["navigation"]["outcome"], "cancelled");
    assert!(test_app.state.wizards.agencies.is_empty().await);
}

#[actix_rt::test]
#[serial]
async fn test_employee_wizard_failure_keeps_session_open() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;
    let token = test_app.admin_token();

    let (_, started) = post(&app, &token, "/api/admin/wizards/employee", None).await;
    assert_eq!(started["form"]["agency_id"], 1);
    let base = format!("/api/admin/wizards/employee/{}", started["id"].as_str().unwrap());

    let steps = [
        json!({ "last_name": "Roux", "first_name": "Lea", "email": "jean.dupont@email.com" }),
        json!({ "role": "employee" }),
        json!({ "password": "secret123", "confirm_password": "secret123" }),
    ];
    for body in steps {
        let (status, view) = patch(&app, &token, &base, body).await;
        assert_eq!(status, 200);
        assert_ne!(view["form"]["password"], "secret123");
        post(&app, &token, &format!("{}/next", base), None).await;
    }

    // the email belongs to an existing account
    let (status, _) = post(&app, &token, &format!("{}/submit", base), None).await;
    assert_eq!(status, 409);

    let (status, view) = patch(&app, &token, &base, json!({ "email": "lea.roux@agence.com" })).await;
    assert_eq!(status, 200);
    assert_eq!(view["status"], "active");
    assert_eq!(view["is_last_step"], true);

    let (status, done) = post(&app, &token, &format!("{}/submit", base), None).await;
    assert_eq!(status, 201);
    assert_eq!(done["created"]["email"], "lea.roux@agence.com");

    let req = test::TestRequest::post()
        .uri("/api/auth/signin")
        .set_json(json!({ "email": "lea.roux@agence.com", "password": "secret123" }))
        .to_request();
    let signin: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(signin["role"], "employee");
}
