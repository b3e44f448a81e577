//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerSettings;
pub use state_builders::{SharedDeps, build_http_state};

use std::net::SocketAddr;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use backend::Trace;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::domain::TokenService;
use backend::inbound::http::configure;
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Everything the worker factory clones into each app instance.
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
    pub tokens: web::Data<TokenService>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        tokens,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(tokens)
        .wrap(Trace)
        .configure(configure)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind `bind_addr` and start serving.
///
/// Readiness flips once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(deps: AppDependencies, bind_addr: SocketAddr) -> std::io::Result<Server> {
    let health_state = deps.health_state.clone();
    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use backend::outbound::media::UnconfiguredUploader;
    use mockable::DefaultClock;
    use rstest::rstest;

    fn deps() -> AppDependencies {
        let tokens = Arc::new(TokenService::new(
            b"server-test-secret",
            Duration::from_secs(60),
            Arc::new(DefaultClock),
        ));
        let state = build_http_state(
            None,
            SharedDeps::new(tokens.clone(), Arc::new(UnconfiguredUploader)),
        );
        AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: web::Data::new(state),
            tokens: web::Data::from(tokens),
        }
    }

    #[rstest]
    #[case("/institutions", StatusCode::OK)]
    #[case("/health/live", StatusCode::OK)]
    #[case("/health/ready", StatusCode::SERVICE_UNAVAILABLE)]
    #[case("/auth/profile", StatusCode::UNAUTHORIZED)]
    #[actix_web::test]
    async fn app_routes_public_and_protected_paths(#[case] path: &str, #[case] status: StatusCode) {
        let app = actix_test::init_service(build_app(deps())).await;
        let req = actix_test::TestRequest::get().uri(path).to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), status);
    }
}
