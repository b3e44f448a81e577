//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations translate between Diesel rows and domain types
//! and hold no business rules. Row structs (`models.rs`) and the table DSL
//! (`schema.rs`) stay private to this module. Connections come from a `bb8`
//! pool through `diesel-async`.
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, PoolConfig, DieselUserRepository};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/reviews")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_institution_repository;
mod diesel_review_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_institution_repository::DieselInstitutionRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
