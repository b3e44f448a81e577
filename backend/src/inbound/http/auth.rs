//! Bearer token authentication for protected routes.
//!
//! [`RequireAuth`] wraps individual handlers. It reads the `Authorization`
//! header, verifies the token with the shared [`TokenService`], and stores an
//! [`AuthenticatedUser`] in the request extensions. Handlers take
//! [`AuthenticatedUser`] as an extractor argument to learn who is calling.

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpMessage, HttpRequest, ResponseError, web};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, error};

use crate::domain::{Error, TokenError, TokenService, UserId};

pub(crate) const NO_TOKEN: &str = "Unauthorized - No token provided";
pub(crate) const INVALID_TOKEN: &str = "Unauthorized - Invalid token";
pub(crate) const EXPIRED_TOKEN: &str = "Unauthorized - Token expired";

/// Identity established by [`RequireAuth`] for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl AuthenticatedUser {
    /// Verified caller id.
    pub fn id(&self) -> &UserId {
        &self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthenticatedUser>()
                .copied()
                .ok_or_else(|| Error::unauthorized(NO_TOKEN)),
        )
    }
}

/// Extract the token from an `Authorization` header value.
///
/// The `Bearer` scheme is matched case-insensitively. Other schemes and
/// empty tokens count as no token at all.
pub(crate) fn bearer_token(header: Option<&str>) -> Option<&str> {
    let (scheme, token) = header?.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

fn map_token_error(err: TokenError) -> Error {
    debug!(error = %err, "bearer token rejected");
    match err {
        TokenError::Expired => Error::unauthorized(EXPIRED_TOKEN),
        TokenError::InvalidToken | TokenError::Malformed => Error::unauthorized(INVALID_TOKEN),
    }
}

fn authenticate(req: &ServiceRequest) -> Result<AuthenticatedUser, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let Some(token) = bearer_token(header) else {
        debug!("request without bearer token");
        return Err(Error::unauthorized(NO_TOKEN));
    };
    let tokens = req.app_data::<web::Data<TokenService>>().ok_or_else(|| {
        error!("token service missing from application data");
        Error::internal("token service is not configured")
    })?;
    tokens
        .verify(token)
        .map(AuthenticatedUser)
        .map_err(map_token_error)
}

/// Middleware rejecting requests without a valid bearer token.
///
/// # Examples
/// ```
/// use actix_web::{App, HttpResponse, web};
/// use backend::inbound::http::auth::RequireAuth;
///
/// let app = App::new().route(
///     "/private",
///     web::get().to(|| async { HttpResponse::Ok() }).wrap(RequireAuth),
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireAuth;

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequireAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Service wrapper produced by [`RequireAuth`].
pub struct RequireAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(&req) {
            Ok(user) => {
                req.extensions_mut().insert(user);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(err) => {
                let response = req.into_response(err.error_response());
                Box::pin(async move { Ok(response.map_into_right_body()) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::Utc;

    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::test_support::MutableClock;

    const SECRET: &[u8] = b"http-auth-test-secret";

    fn token_service(clock: Arc<MutableClock>) -> TokenService {
        TokenService::new(SECRET, Duration::from_secs(60), clock)
    }

    async fn call(
        tokens: TokenService,
        header: Option<String>,
    ) -> actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody> {
        let app = actix_test::init_service(
            App::new().app_data(web::Data::new(tokens)).route(
                "/private",
                web::get()
                    .to(|user: AuthenticatedUser| async move {
                        HttpResponse::Ok().body(user.id().to_string())
                    })
                    .wrap(RequireAuth),
            ),
        )
        .await;
        let mut req = actix_test::TestRequest::get().uri("/private");
        if let Some(value) = header {
            req = req.insert_header((AUTHORIZATION, value));
        }
        actix_test::call_service(&app, req.to_request()).await
    }

    async fn error_message<B: actix_web::body::MessageBody>(res: ServiceResponse<B>) -> String {
        let body: Value = actix_test::read_body_json(res).await;
        body["error"].as_str().unwrap_or_default().to_owned()
    }

    #[rstest]
    #[case(Some("Bearer abc"), Some("abc"))]
    #[case(Some("bearer abc"), Some("abc"))]
    #[case(Some("BEARER   abc  "), Some("abc"))]
    #[case(Some("Bearer "), None)]
    #[case(Some("Bearer"), None)]
    #[case(Some("Basic dXNlcjpwYXNz"), None)]
    #[case(None, None)]
    fn bearer_token_parsing(#[case] header: Option<&str>, #[case] expected: Option<&str>) {
        assert_eq!(bearer_token(header), expected);
    }

    #[actix_web::test]
    async fn valid_token_reaches_the_handler() {
        let tokens = token_service(Arc::new(MutableClock::new(Utc::now())));
        let user = UserId::random();
        let token = tokens.issue(&user).expect("token issued");

        let res = call(tokens, Some(format!("Bearer {token}"))).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = actix_test::read_body(res).await;
        assert_eq!(std::str::from_utf8(&body).expect("utf8"), user.to_string());
    }

    #[rstest]
    #[case(None, NO_TOKEN)]
    #[case(Some("Token abc".to_owned()), NO_TOKEN)]
    #[case(Some("Bearer not-a-jwt".to_owned()), INVALID_TOKEN)]
    #[actix_web::test]
    async fn rejected_requests_get_401(#[case] header: Option<String>, #[case] message: &str) {
        let tokens = token_service(Arc::new(MutableClock::new(Utc::now())));

        let res = call(tokens, header).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_message(res).await, message);
    }

    #[actix_web::test]
    async fn expired_tokens_are_reported_as_expired() {
        let clock = Arc::new(MutableClock::new(Utc::now()));
        let tokens = token_service(clock.clone());
        let token = tokens.issue(&UserId::random()).expect("token issued");
        clock.advance_seconds(120);

        let res = call(tokens, Some(format!("Bearer {token}"))).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_message(res).await, EXPIRED_TOKEN);
    }

    #[actix_web::test]
    async fn extractor_without_middleware_is_unauthorised() {
        let app = actix_test::init_service(App::new().route(
            "/open",
            web::get().to(|_user: AuthenticatedUser| async { HttpResponse::Ok() }),
        ))
        .await;

        let req = actix_test::TestRequest::get().uri("/open").to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
