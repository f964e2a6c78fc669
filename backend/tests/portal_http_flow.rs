//! End-to-end HTTP flow over the in-memory store: signup, login, dashboard,
//! logout.

use std::sync::Arc;

use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use argon2::Params;
use portal::Trace;
use portal::domain::ports::SampleDashboardQuery;
use portal::domain::{AuthenticationGate, DashboardService, RegistrationService};
use portal::inbound::http::accounts::{dashboard, login, logout, signup};
use portal::inbound::http::session_config::{SESSION_COOKIE_NAME, SessionSettings};
use portal::inbound::http::state::HttpState;
use portal::outbound::credentials::CredentialHasher;
use portal::outbound::memory::InMemoryAccountStore;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn state() -> HttpState {
    let params = Params::new(Params::MIN_M_COST, 1, 1, None).expect("argon2 params");
    let store = Arc::new(InMemoryAccountStore::new(CredentialHasher::with_params(
        params,
    )));
    HttpState::new(
        Arc::new(RegistrationService::new(store.clone(), store.clone())),
        Arc::new(AuthenticationGate::new(store.clone(), store.clone())),
        Arc::new(DashboardService::new(
            store.clone(),
            store,
            Arc::new(SampleDashboardQuery),
        )),
    )
}

fn session() -> SessionSettings {
    SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    }
}

macro_rules! portal_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .wrap(Trace)
                .service(
                    web::scope("/api/v1")
                        .wrap(session().middleware())
                        .service(signup)
                        .service(login)
                        .service(logout)
                        .service(dashboard),
                ),
        )
        .await
    };
}

fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
}

fn signup_body(username: &str) -> Value {
    json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": "s3cret-pass",
        "confirmPassword": "s3cret-pass",
        "firstName": "Ada",
        "lastName": "Lovelace",
        "line1": "12 Analytical Row",
        "city": "London",
        "state": "Greater London",
        "pincode": "NW1 6XE",
    })
}

#[rstest]
#[actix_web::test]
async fn patient_signs_up_logs_in_sees_dashboard_and_logs_out(state: HttpState) {
    let app = portal_app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/patient/signup")
            .set_json(signup_body("ada"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(
        res.headers().get(header::LOCATION).expect("location"),
        "/patient/login/"
    );
    assert!(session_cookie(&res).is_none(), "signup must not sign in");
    let created: Value = test::read_body_json(res).await;
    assert!(created["profile"]["addressId"].is_string());

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/patient/login")
            .set_json(json!({ "username": "ada", "password": "s3cret-pass" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = session_cookie(&res).expect("session cookie");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["identityId"], created["identity"]["id"]);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/patient/dashboard")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let board: Value = test::read_body_json(res).await;
    assert_eq!(board["role"], "patient");
    assert_eq!(board["displayName"], "Ada Lovelace");

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/doctor/dashboard")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cleared = session_cookie(&res).expect("removal cookie");
    assert_eq!(cleared.value(), "");
}

#[rstest]
#[actix_web::test]
async fn patient_cannot_open_a_doctor_session(state: HttpState) {
    let app = portal_app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/patient/signup")
            .set_json(signup_body("ada"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/doctor/login")
            .set_json(json!({ "username": "ada", "password": "s3cret-pass" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert!(session_cookie(&res).is_none());
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "forbidden");
}

#[rstest]
#[actix_web::test]
async fn second_signup_with_the_same_username_conflicts(state: HttpState) {
    let app = portal_app!(state);

    for (role, expected) in [
        ("patient", StatusCode::CREATED),
        ("doctor", StatusCode::CONFLICT),
    ] {
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/v1/{role}/signup"))
                .set_json(signup_body("ada"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), expected, "{role}");
    }
}

#[rstest]
#[actix_web::test]
async fn mismatched_passwords_are_rejected_with_field_details(state: HttpState) {
    let app = portal_app!(state);
    let mut body = signup_body("ada");
    body["confirmPassword"] = json!("something-else");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/doctor/signup")
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let error: Value = test::read_body_json(res).await;
    assert_eq!(error["code"], "invalid_request");
    assert_eq!(error["details"]["field"], "confirmPassword");
}
