//! Institution reviews backend.
//!
//! Layout follows a ports-and-adapters split: [`domain`] holds entities,
//! services and ports; [`inbound`] exposes them over HTTP; [`outbound`]
//! implements the ports against PostgreSQL, memory, Argon2 and Cloudinary.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
