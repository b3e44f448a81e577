//! Owner-scoped mutation filters.
//!
//! Updates and deletes of owned records are expressed as a single store
//! operation matching both the record id and the owner field. A miss means
//! "absent or not yours", and callers cannot tell the two apart.

use super::{Error, UserId};

/// Filter matching one record only when `owner` is its enforcement field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnedBy<I> {
    /// Record being mutated.
    pub id: I,
    /// Caller that must match the record's enforcement field.
    pub owner: UserId,
}

impl<I> OwnedBy<I> {
    /// Filter for `id` as owned by `owner`.
    pub fn new(id: I, owner: UserId) -> Self {
        Self { id, owner }
    }
}

/// Per-resource wording for owner-filtered misses and delete confirmations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnedResource {
    /// Message for a miss, whether the record is absent or someone else's.
    pub not_found: &'static str,
    /// Confirmation returned by a successful delete.
    pub deleted: &'static str,
}

/// Institutions, enforced through `added_by`.
pub const INSTITUTION: OwnedResource = OwnedResource {
    not_found: "Institution not found",
    deleted: "Institution deleted successfully",
};

/// Reviews, enforced through `user`.
pub const REVIEW: OwnedResource = OwnedResource {
    not_found: "Review not found",
    deleted: "Review deleted successfully",
};

/// User accounts, which only their holder may change.
pub const ACCOUNT: OwnedResource = OwnedResource {
    not_found: "User not found",
    deleted: "User deleted successfully",
};

impl OwnedResource {
    /// Turn an owner-filtered store result into the record or a uniform 404.
    pub fn require<T>(self, matched: Option<T>) -> Result<T, Error> {
        matched.ok_or_else(|| Error::not_found(self.not_found))
    }
}
