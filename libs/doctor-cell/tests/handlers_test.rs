use std::sync::Arc;

use axum::extract::{Extension, Path, State};
use axum::Json;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doctor_cell::handlers;
use doctor_cell::models::DoctorLoginRequest;
use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_utils::password::hash_password;
use shared_utils::test_utils::{MockDataApiResponses, TestConfig, TestUser};

async fn config_for(mock_server: &MockServer) -> Arc<AppConfig> {
    TestConfig::default().with_data_api(&mock_server.uri()).to_arc()
}

fn auth_extension(user: &TestUser) -> Extension<AuthUser> {
    Extension(user.to_auth_user())
}

fn appointment_for(doctor: &TestUser, amount: i64, payment: bool, completed: bool) -> serde_json::Value {
    let mut doc = MockDataApiResponses::appointment_document(
        &Uuid::new_v4().to_string(),
        &Uuid::new_v4().to_string(),
        &doctor.id,
    );
    doc["amount"] = json!(amount);
    doc["payment"] = json!(payment);
    doc["is_completed"] = json!(completed);
    doc
}

#[tokio::test]
async fn public_list_elides_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/action/find"))
        .and(body_partial_json(json!({ "collection": "doctors" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockDataApiResponses::find(vec![
            MockDataApiResponses::doctor_document(
                &Uuid::new_v4().to_string(),
                "doctor@example.com",
                "Dr. Test",
            ),
        ])))
        .mount(&mock_server)
        .await;

    let state = config_for(&mock_server).await;
    let Json(body) = handlers::list_doctors(State(state)).await.unwrap();

    assert_eq!(body["success"], true);
    let doctor = &body["doctors"][0];
    assert!(doctor.get("password").is_none());
    assert!(doctor.get("email").is_none());
    assert_eq!(doctor["name"], "Dr. Test");
}

#[tokio::test]
async fn login_rejects_unknown_doctor() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/action/findOne"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockDataApiResponses::find_one_empty()),
        )
        .mount(&mock_server)
        .await;

    let state = config_for(&mock_server).await;
    let request = DoctorLoginRequest {
        email: "ghost@example.com".to_string(),
        password: "password123".to_string(),
    };

    let err = handlers::login(State(state), Json(request)).await.unwrap_err();
    assert!(matches!(err, AppError::Auth(_)));
}

#[tokio::test]
async fn login_succeeds_and_mints_doctor_token() {
    let mock_server = MockServer::start().await;

    let mut doctor = MockDataApiResponses::doctor_document(
        &Uuid::new_v4().to_string(),
        "doctor@example.com",
        "Dr. Test",
    );
    doctor["password"] = json!(hash_password("password123").unwrap());

    Mock::given(method("POST"))
        .and(path("/action/findOne"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockDataApiResponses::find_one(doctor)),
        )
        .mount(&mock_server)
        .await;

    let state = config_for(&mock_server).await;
    let request = DoctorLoginRequest {
        email: "doctor@example.com".to_string(),
        password: "password123".to_string(),
    };

    let Json(body) = handlers::login(State(state), Json(request)).await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn handlers_reject_non_doctor_roles() {
    let mock_server = MockServer::start().await;
    let state = config_for(&mock_server).await;

    let patient = TestUser::patient("patient@example.com");
    let err = handlers::dashboard(State(state), auth_extension(&patient))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Auth(_)));
}

#[tokio::test]
async fn dashboard_aggregates_earnings_and_patients() {
    let mock_server = MockServer::start().await;
    let doctor = TestUser::doctor("doctor@example.com");

    let appointments = vec![
        appointment_for(&doctor, 5000, true, false),
        appointment_for(&doctor, 3000, false, true),
        appointment_for(&doctor, 7000, false, false), // unpaid, not completed
    ];

    Mock::given(method("POST"))
        .and(path("/action/find"))
        .and(body_partial_json(json!({ "collection": "appointments" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockDataApiResponses::find(appointments)),
        )
        .mount(&mock_server)
        .await;

    let state = config_for(&mock_server).await;
    let Json(body) = handlers::dashboard(State(state), auth_extension(&doctor))
        .await
        .unwrap();

    assert_eq!(body["dashboard"]["earnings"], 8000);
    assert_eq!(body["dashboard"]["appointments"], 3);
    assert_eq!(body["dashboard"]["patients"], 3);
}

#[tokio::test]
async fn complete_appointment_rejects_other_doctors() {
    let mock_server = MockServer::start().await;

    let doctor = TestUser::doctor("doctor@example.com");
    let appointment_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/action/findOne"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockDataApiResponses::find_one(
            MockDataApiResponses::appointment_document(
                &appointment_id.to_string(),
                &Uuid::new_v4().to_string(),
                &Uuid::new_v4().to_string(), // some other doctor
            ),
        )))
        .mount(&mock_server)
        .await;

    let state = config_for(&mock_server).await;
    let err = handlers::complete_appointment(State(state), Path(appointment_id), auth_extension(&doctor))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Auth(_)));
}

#[tokio::test]
async fn complete_appointment_rejects_cancelled_booking() {
    let mock_server = MockServer::start().await;

    let doctor = TestUser::doctor("doctor@example.com");
    let appointment_id = Uuid::new_v4();

    let mut appointment = MockDataApiResponses::appointment_document(
        &appointment_id.to_string(),
        &Uuid::new_v4().to_string(),
        &doctor.id,
    );
    appointment["cancelled"] = json!(true);

    Mock::given(method("POST"))
        .and(path("/action/findOne"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockDataApiResponses::find_one(appointment)),
        )
        .mount(&mock_server)
        .await;

    let state = config_for(&mock_server).await;
    let err = handlers::complete_appointment(State(state), Path(appointment_id), auth_extension(&doctor))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn complete_appointment_sets_flag() {
    let mock_server = MockServer::start().await;

    let doctor = TestUser::doctor("doctor@example.com");
    let appointment_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/action/findOne"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockDataApiResponses::find_one(
            MockDataApiResponses::appointment_document(
                &appointment_id.to_string(),
                &Uuid::new_v4().to_string(),
                &doctor.id,
            ),
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/action/updateOne"))
        .and(body_partial_json(json!({
            "collection": "appointments",
            "update": { "$set": { "is_completed": true } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockDataApiResponses::updated(1)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let state = config_for(&mock_server).await;
    let Json(body) = handlers::complete_appointment(State(state), Path(appointment_id), auth_extension(&doctor))
        .await
        .unwrap();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn toggle_availability_flips_flag() {
    let mock_server = MockServer::start().await;

    let doctor = TestUser::doctor("doctor@example.com");
    let mut document =
        MockDataApiResponses::doctor_document(&doctor.id, &doctor.email, "Dr. Test");
    document["available"] = json!(true);

    Mock::given(method("POST"))
        .and(path("/action/findOne"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockDataApiResponses::find_one(document)),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/action/updateOne"))
        .and(body_partial_json(json!({
            "collection": "doctors",
            "update": { "$set": { "available": false } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockDataApiResponses::updated(1)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let state = config_for(&mock_server).await;
    let Json(body) = handlers::toggle_availability(State(state), auth_extension(&doctor))
        .await
        .unwrap();

    assert_eq!(body["available"], false);
}
