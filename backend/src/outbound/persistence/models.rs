//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{institutions, reviews, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sparse changeset; `None` columns are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub password_hash: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Institution models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = institutions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct InstitutionRow {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub description: String,
    pub owner_id: Option<Uuid>,
    pub added_by: Uuid,
    pub images: Vec<String>,
}

/// `created_at` is filled by the column default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = institutions)]
pub(crate) struct NewInstitutionRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub location: &'a str,
    pub description: &'a str,
    pub owner_id: Option<Uuid>,
    pub added_by: Uuid,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = institutions)]
pub(crate) struct InstitutionUpdate<'a> {
    pub name: Option<&'a str>,
    pub location: Option<&'a str>,
    pub description: Option<&'a str>,
    pub owner_id: Option<Uuid>,
}

// ---------------------------------------------------------------------------
// Review models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub rating: i16,
    pub comment: String,
    pub user_id: Uuid,
    pub institution_id: Uuid,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow<'a> {
    pub id: Uuid,
    pub rating: i16,
    pub comment: &'a str,
    pub user_id: Uuid,
    pub institution_id: Uuid,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = reviews)]
pub(crate) struct ReviewUpdate<'a> {
    pub rating: Option<i16>,
    pub comment: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}
