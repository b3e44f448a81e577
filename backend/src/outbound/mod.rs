//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: a process-local store for development and tests
//! - **media**: Cloudinary image uploads
//! - **password**: Argon2id hashing
//!
//! Adapters convert between domain types and infrastructure
//! representations. They contain no business logic.

pub mod media;
pub mod memory;
pub mod password;
pub mod persistence;
