//! Tests for the review service.

use super::*;
use crate::domain::ports::{
    MockImageUploader, MockInstitutionRepository, MockReviewRepository, MockUserRepository,
    ReviewRepositoryError,
};
use crate::domain::{
    Email, ErrorCode, Institution, NewReview, PasswordHash, ReviewPatch, StoredUser, User,
    UserName,
};
use crate::test_support::MutableClock;
use chrono::Utc;
use rstest::{fixture, rstest};

type Service = ReviewService<MockReviewRepository, MockInstitutionRepository, MockUserRepository>;

struct Harness {
    reviews: MockReviewRepository,
    institutions: MockInstitutionRepository,
    users: MockUserRepository,
}

impl Harness {
    fn build(self) -> Service {
        let mut uploader = MockImageUploader::new();
        uploader.expect_upload_all().never();
        ReviewService::new(
            Arc::new(self.reviews),
            Arc::new(self.institutions),
            Arc::new(self.users),
            Arc::new(uploader),
            Arc::new(MutableClock::new(Utc::now())),
        )
    }
}

#[fixture]
fn harness() -> Harness {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(|id| {
        let now = Utc::now();
        Ok(Some(StoredUser {
            user: User {
                id: *id,
                name: UserName::new("Ada").expect("name"),
                email: Email::new("a@x.com").expect("email"),
                verified: false,
                created_at: now,
                updated_at: now,
            },
            password_hash: PasswordHash::new("digest"),
        }))
    });
    Harness {
        reviews: MockReviewRepository::new(),
        institutions: MockInstitutionRepository::new(),
        users,
    }
}

fn new_review(institution: InstitutionId) -> NewReview {
    NewReview::try_from_parts(Some("5"), Some("Great"), Some(&institution.to_string()))
        .expect("input")
}

fn institution(id: InstitutionId) -> Institution {
    Institution {
        id,
        name: "Uni".to_owned(),
        location: "Town".to_owned(),
        description: "Desc".to_owned(),
        owner: None,
        added_by: UserId::random(),
        images: Vec::new(),
    }
}

#[rstest]
#[tokio::test]
async fn create_sets_author_from_actor(mut harness: Harness) {
    let institution_id = InstitutionId::random();
    harness
        .institutions
        .expect_find_by_id()
        .return_once(move |id| Ok(Some(institution(*id))));
    harness.reviews.expect_create().times(1).return_once(|_| Ok(()));
    let actor = UserId::random();

    let review = harness
        .build()
        .create(CreateReviewRequest {
            actor,
            input: new_review(institution_id),
            images: Vec::new(),
        })
        .await
        .expect("create succeeds");
    assert_eq!(review.user, actor);
    assert_eq!(review.institution, institution_id);
    assert_eq!(review.rating.get(), 5);
    assert_eq!(review.created_at, review.updated_at);
}

#[rstest]
#[tokio::test]
async fn create_for_missing_institution_is_not_found(mut harness: Harness) {
    harness.institutions.expect_find_by_id().return_once(|_| Ok(None));
    harness.reviews.expect_create().never();

    let err = harness
        .build()
        .create(CreateReviewRequest {
            actor: UserId::random(),
            input: new_review(InstitutionId::random()),
            images: Vec::new(),
        })
        .await
        .expect_err("missing institution");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "Institution not found");
}

#[rstest]
#[tokio::test]
async fn institution_deleted_mid_create_is_not_found(mut harness: Harness) {
    harness
        .institutions
        .expect_find_by_id()
        .return_once(move |id| Ok(Some(institution(*id))));
    harness
        .reviews
        .expect_create()
        .return_once(|_| Err(ReviewRepositoryError::missing_reference("institution")));

    let err = harness
        .build()
        .create(CreateReviewRequest {
            actor: UserId::random(),
            input: new_review(InstitutionId::random()),
            images: Vec::new(),
        })
        .await
        .expect_err("raced delete");
    assert_eq!(err.message(), "Institution not found");
}

#[rstest]
#[tokio::test]
async fn update_by_non_author_is_not_found(mut harness: Harness) {
    let attacker = UserId::random();
    harness
        .reviews
        .expect_update_owned()
        .withf(move |filter, _, _, _| filter.owner == attacker)
        .times(1)
        .return_once(|_, _, _, _| Ok(None));

    let err = harness
        .build()
        .update(UpdateReviewRequest {
            actor: attacker,
            id: ReviewId::random(),
            patch: ReviewPatch::try_from_parts(Some("1"), None).expect("patch"),
            images: Vec::new(),
        })
        .await
        .expect_err("not the author");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "Review not found");
}

#[rstest]
#[tokio::test]
async fn second_delete_is_not_found(mut harness: Harness) {
    let mut deleted = false;
    harness.reviews.expect_delete_owned().times(2).returning(move |filter| {
        if deleted {
            return Ok(None);
        }
        deleted = true;
        let now = Utc::now();
        Ok(Some(Review {
            id: filter.id,
            rating: crate::domain::Rating::parse("3").expect("rating"),
            comment: "ok".to_owned(),
            user: filter.owner,
            institution: InstitutionId::random(),
            images: Vec::new(),
            created_at: now,
            updated_at: now,
        }))
    });
    let service = harness.build();
    let actor = UserId::random();
    let id = ReviewId::random();

    service.delete(&actor, &id).await.expect("first delete");
    let err = service.delete(&actor, &id).await.expect_err("second delete");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
