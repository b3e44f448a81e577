//! Test helpers for inbound HTTP components.

use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{App, test as actix_test, web};
use serde_json::{Value, json};

use crate::Trace;
use crate::inbound::http::configure;
use crate::test_support::TestServices;

/// Build an app with every API route, backed by `services`.
pub fn test_app(
    services: &TestServices,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .app_data(web::Data::new(services.state.clone()))
        .app_data(web::Data::from(services.tokens.clone()))
        .wrap(Trace)
        .configure(configure)
}

/// Register an account and return `(user id, bearer token)`.
pub async fn register(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    name: &str,
    email: &str,
) -> (String, String) {
    let req = actix_test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({"name": name, "email": email, "password": "secret"}))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(app, req).await;
    let id = body
        .pointer("/user/id")
        .and_then(Value::as_str)
        .expect("user id")
        .to_owned();
    let token = body
        .get("token")
        .and_then(Value::as_str)
        .expect("token")
        .to_owned();
    (id, token)
}

/// `Authorization` header carrying `token`.
pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

/// Read the response body as JSON.
pub async fn json_body(res: ServiceResponse) -> Value {
    let body = actix_test::read_body(res).await;
    serde_json::from_slice(&body).expect("json body")
}
