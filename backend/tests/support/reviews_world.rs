//! Server harness and shared world for the reviews API behaviour tests.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. Dropping the [`WorldFixture`] stops
//! the server even if a step panics.

use std::cell::RefCell;
use std::collections::HashMap;
use std::net::TcpListener;
use std::rc::Rc;

use actix_web::dev::ServerHandle;
use actix_web::http::Method;
use actix_web::{App, HttpServer, web};
use awc::Client;
use backend::Trace;
use backend::domain::TRACE_ID_HEADER;
use backend::inbound::http::configure;
use backend::test_support::TestServices;
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

/// A registered account as seen by the client.
#[derive(Debug, Clone)]
pub(crate) struct Account {
    pub(crate) id: String,
    pub(crate) token: String,
}

pub(crate) struct ReviewsWorld {
    pub(crate) runtime: Runtime,
    pub(crate) local: LocalSet,
    pub(crate) base_url: String,
    pub(crate) server: ServerHandle,
    pub(crate) accounts: HashMap<String, Account>,
    pub(crate) institution_id: Option<String>,
    pub(crate) review_id: Option<String>,
    pub(crate) last_status: Option<u16>,
    pub(crate) last_body: Option<Value>,
    pub(crate) last_trace_id: Option<String>,
}

pub(crate) type SharedWorld = Rc<RefCell<ReviewsWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        let ctx = self.world.borrow();
        let server = ctx.server.clone();
        ctx.local.block_on(&ctx.runtime, async move {
            server.stop(true).await;
        });
    }
}

/// One request issued by a step.
pub(crate) struct ApiRequest<'a> {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) token: Option<&'a str>,
    pub(crate) payload: Option<Value>,
}

/// Send `request` and record status, trace id and body on the world.
pub(crate) fn perform(world: &SharedWorld, request: ApiRequest<'_>) {
    let ApiRequest {
        method,
        path,
        token,
        payload,
    } = request;
    let auth = token.map(|token| format!("Bearer {token}"));
    let (status, trace_id, body) = {
        let ctx = world.borrow();
        let url = format!("{}{path}", ctx.base_url);
        ctx.local.block_on(&ctx.runtime, async move {
            let mut req = Client::default().request(method, url);
            if let Some(auth) = auth {
                req = req.insert_header(("Authorization", auth));
            }
            let mut response = match payload {
                Some(payload) => req.send_json(&payload).await.expect("request"),
                None => req.send().await.expect("request"),
            };
            let status = response.status().as_u16();
            let trace_id = response
                .headers()
                .get(TRACE_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let bytes = response.body().await.expect("response body");
            let body = serde_json::from_slice::<Value>(&bytes).ok();
            (status, trace_id, body)
        })
    };

    let mut ctx = world.borrow_mut();
    ctx.last_status = Some(status);
    ctx.last_trace_id = trace_id;
    ctx.last_body = body;
}

/// The account registered under `name`.
pub(crate) fn account(world: &SharedWorld, name: &str) -> Account {
    world
        .borrow()
        .accounts
        .get(name)
        .cloned()
        .unwrap_or_else(|| panic!("{name} has not registered"))
}

fn spawn_server(services: &TestServices) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;
    let http_state = web::Data::new(services.state.clone());
    let tokens = web::Data::from(services.tokens.clone());

    let server = HttpServer::new(move || {
        App::new()
            .app_data(http_state.clone())
            .app_data(tokens.clone())
            .wrap(Trace)
            .configure(configure)
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);
    Ok((format!("http://{addr}"), handle))
}

pub(crate) fn world() -> WorldFixture {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();
    let services = TestServices::new();
    let (base_url, server) = local
        .block_on(&runtime, async { spawn_server(&services) })
        .expect("spawn reviews server");

    WorldFixture {
        world: Rc::new(RefCell::new(ReviewsWorld {
            runtime,
            local,
            base_url,
            server,
            accounts: HashMap::new(),
            institution_id: None,
            review_id: None,
            last_status: None,
            last_body: None,
            last_trace_id: None,
        })),
    }
}
