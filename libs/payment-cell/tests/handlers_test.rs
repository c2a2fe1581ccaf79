use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Extension, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use payment_cell::handlers;
use payment_cell::models::CreateCheckoutRequest;
use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_utils::test_utils::{MockDataApiResponses, TestConfig, TestUser};

type HmacSha256 = Hmac<Sha256>;

fn config_for(data_api: &MockServer, stripe: &MockServer) -> Arc<AppConfig> {
    TestConfig::default()
        .with_data_api(&data_api.uri())
        .with_stripe(&stripe.uri())
        .to_arc()
}

fn auth_extension(user: &TestUser) -> Extension<AuthUser> {
    Extension(user.to_auth_user())
}

fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(format!("{}.", timestamp).as_bytes());
    mac.update(payload);
    let digest = mac.finalize().into_bytes();
    use std::fmt::Write;
    digest.iter().fold(String::new(), |mut acc, b| {
        let _ = write!(acc, "{:02x}", b);
        acc
    })
}

fn signature_headers(secret: &str, payload: &[u8]) -> HeaderMap {
    let t = Utc::now().timestamp();
    let mut headers = HeaderMap::new();
    headers.insert(
        "Stripe-Signature",
        format!("t={},v1={}", t, sign_payload(secret, t, payload))
            .parse()
            .unwrap(),
    );
    headers
}

fn completed_event(appointment_id: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "id": "evt_1",
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": "cs_1",
                "payment_status": "paid",
                "metadata": { "appointment_id": appointment_id }
            }
        }
    }))
    .unwrap()
}

#[tokio::test]
async fn checkout_returns_session_url() {
    let data_api = MockServer::start().await;
    let stripe = MockServer::start().await;

    let user = TestUser::patient("patient@example.com");
    let appointment_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/action/findOne"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockDataApiResponses::find_one(
            MockDataApiResponses::appointment_document(
                &appointment_id.to_string(),
                &user.id,
                &Uuid::new_v4().to_string(),
            ),
        )))
        .mount(&data_api)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .and(header("authorization", "Bearer sk_test_123"))
        .and(body_string_contains("unit_amount%5D=5000"))
        .and(body_string_contains(&appointment_id.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs_test_1",
            "url": "https://checkout.stripe.test/pay/cs_test_1"
        })))
        .expect(1)
        .mount(&stripe)
        .await;

    let state = config_for(&data_api, &stripe);
    let request = CreateCheckoutRequest { appointment_id };

    let Json(body) =
        handlers::create_checkout_session(State(state), auth_extension(&user), Json(request))
            .await
            .unwrap();

    assert_eq!(body["success"], true);
    assert_eq!(body["session_url"], "https://checkout.stripe.test/pay/cs_test_1");
}

#[tokio::test]
async fn checkout_refuses_foreign_appointment() {
    let data_api = MockServer::start().await;
    let stripe = MockServer::start().await;

    let user = TestUser::patient("patient@example.com");
    let appointment_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/action/findOne"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockDataApiResponses::find_one(
            MockDataApiResponses::appointment_document(
                &appointment_id.to_string(),
                &Uuid::new_v4().to_string(), // someone else's booking
                &Uuid::new_v4().to_string(),
            ),
        )))
        .mount(&data_api)
        .await;

    let state = config_for(&data_api, &stripe);
    let request = CreateCheckoutRequest { appointment_id };

    let err = handlers::create_checkout_session(State(state), auth_extension(&user), Json(request))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Auth(_)));
}

#[tokio::test]
async fn checkout_refuses_cancelled_and_paid_appointments() {
    let data_api = MockServer::start().await;
    let stripe = MockServer::start().await;

    let user = TestUser::patient("patient@example.com");
    let appointment_id = Uuid::new_v4();

    let mut cancelled = MockDataApiResponses::appointment_document(
        &appointment_id.to_string(),
        &user.id,
        &Uuid::new_v4().to_string(),
    );
    cancelled["cancelled"] = json!(true);

    Mock::given(method("POST"))
        .and(path("/action/findOne"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockDataApiResponses::find_one(cancelled)),
        )
        .up_to_n_times(1)
        .mount(&data_api)
        .await;

    let state = config_for(&data_api, &stripe);
    let err = handlers::create_checkout_session(
        State(state.clone()),
        auth_extension(&user),
        Json(CreateCheckoutRequest { appointment_id }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let mut paid = MockDataApiResponses::appointment_document(
        &appointment_id.to_string(),
        &user.id,
        &Uuid::new_v4().to_string(),
    );
    paid["payment"] = json!(true);

    Mock::given(method("POST"))
        .and(path("/action/findOne"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockDataApiResponses::find_one(paid)),
        )
        .mount(&data_api)
        .await;

    let err = handlers::create_checkout_session(
        State(state),
        auth_extension(&user),
        Json(CreateCheckoutRequest { appointment_id }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn webhook_marks_appointment_paid() {
    let data_api = MockServer::start().await;
    let stripe = MockServer::start().await;

    let appointment_id = Uuid::new_v4().to_string();

    Mock::given(method("POST"))
        .and(path("/action/updateOne"))
        .and(body_partial_json(json!({
            "collection": "appointments",
            "filter": { "_id": appointment_id },
            "update": { "$set": { "payment": true } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockDataApiResponses::updated(1)))
        .expect(1)
        .mount(&data_api)
        .await;

    let state = config_for(&data_api, &stripe);
    let payload = completed_event(&appointment_id);
    let headers = signature_headers(&state.stripe_webhook_secret, &payload);

    let Json(body) = handlers::webhook(State(state), headers, Bytes::from(payload))
        .await
        .unwrap();
    assert_eq!(body["received"], true);
}

#[tokio::test]
async fn webhook_rejects_tampered_payload() {
    let data_api = MockServer::start().await;
    let stripe = MockServer::start().await;

    let state = config_for(&data_api, &stripe);
    let payload = completed_event(&Uuid::new_v4().to_string());
    let headers = signature_headers(&state.stripe_webhook_secret, &payload);

    let mut tampered = payload.clone();
    tampered.extend_from_slice(b" ");

    let err = handlers::webhook(State(state), headers, Bytes::from(tampered))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn webhook_rejects_stale_timestamp() {
    let data_api = MockServer::start().await;
    let stripe = MockServer::start().await;

    let state = config_for(&data_api, &stripe);
    let payload = completed_event(&Uuid::new_v4().to_string());

    let stale = Utc::now().timestamp() - 400;
    let mut headers = HeaderMap::new();
    headers.insert(
        "Stripe-Signature",
        format!(
            "t={},v1={}",
            stale,
            sign_payload(&state.stripe_webhook_secret, stale, &payload)
        )
        .parse()
        .unwrap(),
    );

    let err = handlers::webhook(State(state), headers, Bytes::from(payload))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn webhook_acknowledges_unrelated_events_without_writes() {
    let data_api = MockServer::start().await;
    let stripe = MockServer::start().await;

    // No update must reach the database for an event we do not act on.
    Mock::given(method("POST"))
        .and(path("/action/updateOne"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockDataApiResponses::updated(1)))
        .expect(0)
        .mount(&data_api)
        .await;

    let state = config_for(&data_api, &stripe);
    let payload = serde_json::to_vec(&json!({
        "id": "evt_2",
        "type": "payment_intent.created",
        "data": { "object": { "id": "pi_1" } }
    }))
    .unwrap();
    let headers = signature_headers(&state.stripe_webhook_secret, &payload);

    let Json(body) = handlers::webhook(State(state), headers, Bytes::from(payload))
        .await
        .unwrap();
    assert_eq!(body["received"], true);
}
