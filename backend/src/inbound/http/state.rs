//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on driving
//! ports, so they can be exercised without a database or image host.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AccountQuery, InstitutionCommand, InstitutionQuery, ReviewCommand,
    ReviewQuery,
};

/// Parameter object bundling the port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountCommand>,
    pub accounts_query: Arc<dyn AccountQuery>,
    pub institutions: Arc<dyn InstitutionCommand>,
    pub institutions_query: Arc<dyn InstitutionQuery>,
    pub reviews: Arc<dyn ReviewCommand>,
    pub reviews_query: Arc<dyn ReviewQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub accounts_query: Arc<dyn AccountQuery>,
    pub institutions: Arc<dyn InstitutionCommand>,
    pub institutions_query: Arc<dyn InstitutionQuery>,
    pub reviews: Arc<dyn ReviewCommand>,
    pub reviews_query: Arc<dyn ReviewQuery>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// Services usually implement both halves of a command/query pair, so
    /// the same `Arc` is passed twice.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            accounts_query,
            institutions,
            institutions_query,
            reviews,
            reviews_query,
        } = ports;
        Self {
            accounts,
            accounts_query,
            institutions,
            institutions_query,
            reviews,
            reviews_query,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
