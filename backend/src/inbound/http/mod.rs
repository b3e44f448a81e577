//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;
use serde::Serialize;

pub mod accounts;
pub mod auth;
pub mod error;
pub mod health;
pub mod institutions;
pub mod payload;
pub mod reviews;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// `{"message": "..."}` confirmation body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Register every API route.
///
/// The application must also carry `web::Data<HttpState>` and
/// `web::Data<TokenService>`; the latter is read by [`auth::RequireAuth`].
/// Health probes are registered separately because they need their own
/// state.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(accounts::register)
        .service(accounts::login)
        .service(accounts::profile)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(institutions::list_institutions)
        .service(institutions::create_institution)
        .service(institutions::get_institution)
        .service(institutions::update_institution)
        .service(institutions::delete_institution)
        .service(reviews::create_review)
        .service(reviews::reviews_for_institution)
        .service(reviews::reviews_by_user)
        .service(reviews::update_review)
        .service(reviews::delete_review);
}
