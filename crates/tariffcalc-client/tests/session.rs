//! Integration tests for `TariffSession` against a mocked backend.

use tariffcalc_client::{SessionError, TariffClient, TariffSession};
use tariffcalc_core::{
    CalculationForm, City, Language, ServiceKind, TariffType, ValidationError, WarningMessage,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> TariffClient {
    TariffClient::with_base_url(base_url, 30).expect("client construction should not fail")
}

async fn mount_list(server: &MockServer, endpoint: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_cities(server: &MockServer) {
    mount_list(
        server,
        "/api/cities",
        serde_json::json!({
            "data": [
                {
                    "id": 1,
                    "name": { "uz": "Toshkent", "ru": "Ташкент", "en": "Tashkent" },
                    "latitude": 41.31,
                    "longitude": 69.28
                },
                {
                    "id": 2,
                    "name": { "uz": "Samarqand", "ru": "Самарканд", "en": "Samarkand" },
                    "latitude": 39.65,
                    "longitude": 66.96
                }
            ]
        }),
    )
    .await;
}

fn form(session: &TariffSession, tariff: TariffType) -> CalculationForm {
    CalculationForm {
        origin: session.find_city("Tashkent").cloned(),
        destination: session.find_city("Samarkand").cloned(),
        tariff: Some(tariff),
        weight: Some(2.0),
    }
}

#[tokio::test]
async fn office_door_from_tashkent_is_allowed_and_calculated() {
    let server = MockServer::start().await;
    mount_list(
        &server,
        "/api/warehouses",
        serde_json::json!({ "data": { "list": [
            { "id": 1, "name": "Chilonzor", "city": "Toshkent shahri" }
        ] } }),
    )
    .await;
    mount_list(&server, "/api/lockers", serde_json::json!({ "data": [] })).await;
    mount_cities(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/calculate-tariff"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "price": 25000, "currency": "UZS" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = TariffSession::start(test_client(&server.uri()), Language::En).await;
    assert!(!session.has_load_error());

    let form = form(&session, TariffType::OfficeDoor);
    let eligibility = session.eligibility(
        form.origin.as_ref(),
        form.destination.as_ref(),
        form.tariff,
    );
    assert!(!eligibility.blocked);
    assert!(!eligibility.warning_visible);

    let quote = session.calculate(&form).await.expect("should calculate");
    assert_eq!(quote.price, Some(25000.0));
}

#[tokio::test]
async fn warehouse_failure_keeps_lockers_and_flags_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/warehouses"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_list(
        &server,
        "/api/lockers",
        serde_json::json!({ "data": [ { "id": 9, "name": "Locker", "city": "Samarkand" } ] }),
    )
    .await;
    mount_cities(&server).await;

    let session = TariffSession::start(test_client(&server.uri()), Language::En).await;
    assert!(session.has_load_error());

    let index = session.index().ready().expect("index should be ready");
    assert!(index.has_locker("Samarkand"));
    assert!(!index.has_warehouse("Samarkand"));
    assert_eq!(index.failed_lists(), &[ServiceKind::Warehouse]);

    let form = form(&session, TariffType::DoorPostamat);
    let eligibility = session.eligibility(
        form.origin.as_ref(),
        form.destination.as_ref(),
        form.tariff,
    );
    assert!(!eligibility.blocked);
}

#[tokio::test]
async fn city_failure_still_loads_availability() {
    let server = MockServer::start().await;
    mount_list(&server, "/api/warehouses", serde_json::json!({ "data": [] })).await;
    mount_list(&server, "/api/lockers", serde_json::json!({ "data": [] })).await;
    Mock::given(method("GET"))
        .and(path("/api/cities"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let session = TariffSession::start(test_client(&server.uri()), Language::En).await;
    assert!(session.has_load_error());
    assert!(session.cities().is_empty());
    assert!(session.index().ready().is_some());
}

#[tokio::test]
async fn blocked_selection_is_refused_without_posting() {
    let server = MockServer::start().await;
    mount_list(&server, "/api/warehouses", serde_json::json!({ "data": [] })).await;
    mount_list(&server, "/api/lockers", serde_json::json!({ "data": [] })).await;
    mount_cities(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/calculate-tariff"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let session = TariffSession::start(test_client(&server.uri()), Language::Ru).await;
    let err = session
        .calculate(&form(&session, TariffType::OfficeOffice))
        .await
        .expect_err("no warehouses anywhere should block");

    match err {
        SessionError::Ineligible { warning } => assert_eq!(
            warning,
            Some(WarningMessage::NoWarehousesAtEitherEnd {
                origin: "Ташкент".to_string(),
                destination: "Самарканд".to_string(),
            })
        ),
        other => panic!("expected Ineligible, got: {other:?}"),
    }
}

#[tokio::test]
async fn invalid_form_is_rejected_before_eligibility() {
    let server = MockServer::start().await;
    let session = TariffSession::new(test_client(&server.uri()), Language::En);

    let form = CalculationForm {
        origin: Some(City::plain(1, "Tashkent", Some((41.31, 69.28)))),
        destination: Some(City::plain(2, "Samarkand", Some((39.65, 66.96)))),
        tariff: Some(TariffType::DoorDoor),
        weight: Some(0.0),
    };
    let err = session.calculate(&form).await.expect_err("zero weight");
    assert!(matches!(
        err,
        SessionError::Validation(ValidationError::NonPositiveWeight(_))
    ));
}

#[tokio::test]
async fn calculation_failure_surfaces_generic_message() {
    let server = MockServer::start().await;
    mount_list(&server, "/api/warehouses", serde_json::json!({ "data": [] })).await;
    mount_list(&server, "/api/lockers", serde_json::json!({ "data": [] })).await;
    mount_cities(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/calculate-tariff"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let session = TariffSession::start(test_client(&server.uri()), Language::En).await;
    let err = session
        .calculate(&form(&session, TariffType::DoorDoor))
        .await
        .expect_err("500 should fail");

    assert_eq!(
        err.to_string(),
        "tariff calculation failed, please try again later"
    );
}

#[tokio::test]
async fn find_city_resolves_any_spelling() {
    let server = MockServer::start().await;
    mount_list(&server, "/api/warehouses", serde_json::json!({ "data": [] })).await;
    mount_list(&server, "/api/lockers", serde_json::json!({ "data": [] })).await;
    mount_cities(&server).await;

    let session = TariffSession::start(test_client(&server.uri()), Language::Uz).await;
    let city = session.find_city("г. Самарканд").expect("should resolve");
    assert_eq!(city.display_name(Language::Uz), "Samarqand");
}
