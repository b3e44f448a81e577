//! Review records and their validated create/update inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::institution::{ResourceValidationError, optional_text, required_text};
use super::{InstitutionId, ReviewId, UserId};

/// Star rating between 1 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub struct Rating(u8);

impl Rating {
    /// Lowest accepted rating.
    pub const MIN: i16 = 1;
    /// Highest accepted rating.
    pub const MAX: i16 = 5;

    /// Parse a rating from a number or numeric string such as `"4"`.
    pub fn parse(raw: &str) -> Result<Self, ResourceValidationError> {
        let value: i16 = raw
            .trim()
            .parse()
            .map_err(|_| ResourceValidationError::InvalidRating)?;
        Self::try_from(value)
    }

    /// Numeric star value.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i16> for Rating {
    type Error = ResourceValidationError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ResourceValidationError::InvalidRating);
        }
        u8::try_from(value)
            .map(Self)
            .map_err(|_| ResourceValidationError::InvalidRating)
    }
}

impl From<Rating> for i16 {
    fn from(value: Rating) -> Self {
        i16::from(value.0)
    }
}

/// A user's rating and comment on an institution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub rating: Rating,
    pub comment: String,
    /// Author and enforcement field.
    pub user: UserId,
    pub institution: InstitutionId,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated create input. The author comes from the verified identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub rating: Rating,
    pub comment: String,
    pub institution: InstitutionId,
}

impl NewReview {
    pub fn try_from_parts(
        rating: Option<&str>,
        comment: Option<&str>,
        institution: Option<&str>,
    ) -> Result<Self, ResourceValidationError> {
        let rating = rating.ok_or(ResourceValidationError::Missing { field: "rating" })?;
        let institution =
            institution.ok_or(ResourceValidationError::Missing { field: "institution" })?;
        Ok(Self {
            rating: Rating::parse(rating)?,
            comment: required_text(comment, "comment")?,
            institution: InstitutionId::new(institution.trim()).map_err(|_| {
                ResourceValidationError::InvalidReference {
                    field: "institution",
                }
            })?,
        })
    }
}

/// Sparse review update. Only rating and comment are mutable; images are
/// appended separately.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewPatch {
    pub rating: Option<Rating>,
    pub comment: Option<String>,
}

impl ReviewPatch {
    pub fn try_from_parts(
        rating: Option<&str>,
        comment: Option<&str>,
    ) -> Result<Self, ResourceValidationError> {
        Ok(Self {
            rating: rating.map(Rating::parse).transpose()?,
            comment: optional_text(comment, "comment")?,
        })
    }

    /// Apply the patch, append `images` and stamp `updated_at`.
    pub fn apply(&self, review: &mut Review, images: &[String], now: DateTime<Utc>) {
        if let Some(rating) = self.rating {
            review.rating = rating;
        }
        if let Some(comment) = &self.comment {
            review.comment.clone_from(comment);
        }
        review.images.extend_from_slice(images);
        review.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0")]
    #[case("6")]
    #[case("-1")]
    #[case("4.5")]
    #[case("five")]
    fn ratings_outside_range_are_rejected(#[case] raw: &str) {
        assert_eq!(Rating::parse(raw), Err(ResourceValidationError::InvalidRating));
    }

    #[rstest]
    #[case("1", 1)]
    #[case(" 5 ", 5)]
    fn ratings_accept_numeric_strings(#[case] raw: &str, #[case] expected: u8) {
        assert_eq!(Rating::parse(raw).map(Rating::get), Ok(expected));
    }

    #[rstest]
    fn new_review_requires_an_institution_id() {
        let err = NewReview::try_from_parts(Some("4"), Some("Nice"), Some("abc"))
            .expect_err("bad reference");
        assert_eq!(
            err,
            ResourceValidationError::InvalidReference {
                field: "institution"
            }
        );
    }

    #[rstest]
    fn patch_keeps_rating_when_only_comment_supplied() {
        let created = Utc::now();
        let mut review = Review {
            id: ReviewId::random(),
            rating: Rating::parse("4").expect("rating"),
            comment: "Fine".to_owned(),
            user: UserId::random(),
            institution: InstitutionId::random(),
            images: vec!["u1".to_owned()],
            created_at: created,
            updated_at: created,
        };
        let patch = ReviewPatch::try_from_parts(None, Some("Better")).expect("patch");
        patch.apply(&mut review, &["u2".to_owned()], created);

        assert_eq!(review.rating.get(), 4);
        assert_eq!(review.comment, "Better");
        assert_eq!(review.images, vec!["u1".to_owned(), "u2".to_owned()]);
    }

    #[rstest]
    fn rating_serializes_as_number() {
        let rating = Rating::parse("3").expect("rating");
        assert_eq!(serde_json::to_value(rating).expect("serialize"), 3);
        assert!(serde_json::from_value::<Rating>(serde_json::json!(9)).is_err());
    }
}
