//! Tests for the institution service.

use super::*;
use crate::domain::ports::{
    ImageFile, ImageUploadError, MockImageUploader, MockInstitutionRepository, MockUserRepository,
};
use crate::domain::{
    Email, ErrorCode, InstitutionPatch, NewInstitution, PasswordHash, StoredUser, User, UserName,
};
use chrono::Utc;
use rstest::{fixture, rstest};

type Service = InstitutionService<MockInstitutionRepository, MockUserRepository>;

struct Harness {
    institutions: MockInstitutionRepository,
    users: MockUserRepository,
    uploader: MockImageUploader,
}

impl Harness {
    fn build(self) -> Service {
        InstitutionService::new(
            Arc::new(self.institutions),
            Arc::new(self.users),
            Arc::new(self.uploader),
        )
    }

    fn with_existing_actor(mut self) -> Self {
        self.users.expect_find_by_id().returning(|id| {
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
        self
    }
}

#[fixture]
fn harness() -> Harness {
    Harness {
        institutions: MockInstitutionRepository::new(),
        users: MockUserRepository::new(),
        uploader: MockImageUploader::new(),
    }
}

fn image(name: &str) -> ImageFile {
    ImageFile {
        file_name: name.to_owned(),
        content_type: Some("image/jpeg".to_owned()),
        bytes: vec![1, 2, 3],
    }
}

fn new_institution() -> NewInstitution {
    NewInstitution::try_from_parts(Some("Uni"), Some("Town"), Some("Desc"), None).expect("input")
}

#[rstest]
#[tokio::test]
async fn create_stamps_added_by_and_uploaded_urls(harness: Harness) {
    let mut harness = harness.with_existing_actor();
    harness
        .uploader
        .expect_upload_all()
        .times(1)
        .return_once(|files| {
            Ok(files
                .iter()
                .map(|f| format!("https://cdn/{}", f.file_name))
                .collect())
        });
    harness
        .institutions
        .expect_create()
        .times(1)
        .return_once(|_| Ok(()));
    let actor = UserId::random();

    let created = harness
        .build()
        .create(CreateInstitutionRequest {
            actor,
            input: new_institution(),
            images: vec![image("a.jpg")],
        })
        .await
        .expect("create succeeds");
    assert_eq!(created.added_by, actor);
    assert_eq!(created.images, vec!["https://cdn/a.jpg".to_owned()]);
}

#[rstest]
#[tokio::test]
async fn create_without_files_skips_uploader(harness: Harness) {
    let mut harness = harness.with_existing_actor();
    harness.uploader.expect_upload_all().never();
    harness.institutions.expect_create().return_once(|_| Ok(()));

    let created = harness
        .build()
        .create(CreateInstitutionRequest {
            actor: UserId::random(),
            input: new_institution(),
            images: Vec::new(),
        })
        .await
        .expect("create succeeds");
    assert!(created.images.is_empty());
}

#[rstest]
#[tokio::test]
async fn upload_failure_persists_nothing(harness: Harness) {
    let mut harness = harness.with_existing_actor();
    harness
        .uploader
        .expect_upload_all()
        .return_once(|_| Err(ImageUploadError::transport("timeout")));
    harness.institutions.expect_create().never();

    let err = harness
        .build()
        .create(CreateInstitutionRequest {
            actor: UserId::random(),
            input: new_institution(),
            images: vec![image("a.jpg")],
        })
        .await
        .expect_err("upload fails");
    assert_eq!(err.code(), ErrorCode::UploadFailed);
}

#[rstest]
#[tokio::test]
async fn create_by_deleted_user_is_unauthorized(mut harness: Harness) {
    harness.users.expect_find_by_id().return_once(|_| Ok(None));
    harness.institutions.expect_create().never();

    let err = harness
        .build()
        .create(CreateInstitutionRequest {
            actor: UserId::random(),
            input: new_institution(),
            images: Vec::new(),
        })
        .await
        .expect_err("stale identity");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn update_filters_on_actor(mut harness: Harness) {
    let actor = UserId::random();
    let id = InstitutionId::random();
    harness
        .institutions
        .expect_update_owned()
        .withf(move |filter, _, images| {
            filter.owner == actor && filter.id == id && images.is_empty()
        })
        .times(1)
        .return_once(|_, _, _| Ok(None));

    let err = harness
        .build()
        .update(UpdateInstitutionRequest {
            actor,
            id,
            patch: InstitutionPatch::default(),
            images: Vec::new(),
        })
        .await
        .expect_err("no match");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "Institution not found");
}

#[rstest]
#[tokio::test]
async fn delete_miss_is_not_found(mut harness: Harness) {
    harness
        .institutions
        .expect_delete_owned()
        .return_once(|_| Ok(None));

    let err = harness
        .build()
        .delete(&UserId::random(), &InstitutionId::random())
        .await
        .expect_err("no match");
    assert_eq!(err.message(), "Institution not found");
}

#[rstest]
#[tokio::test]
async fn get_missing_institution_is_not_found(mut harness: Harness) {
    harness.institutions.expect_find_by_id().return_once(|_| Ok(None));

    let err = harness
        .build()
        .get(&InstitutionId::random())
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn update_miss_after_upload_is_still_not_found(mut harness: Harness) {
    harness
        .uploader
        .expect_upload_all()
        .times(1)
        .return_once(|_| Ok(vec!["https://cdn/late.png".to_owned()]));
    harness
        .institutions
        .expect_update_owned()
        .withf(|_, _, images| images == ["https://cdn/late.png".to_owned()])
        .times(1)
        .return_once(|_, _, _| Ok(None));

    let err = harness
        .build()
        .update(UpdateInstitutionRequest {
            actor: UserId::random(),
            id: InstitutionId::random(),
            patch: InstitutionPatch::default(),
            images: vec![image("late.png")],
        })
        .await
        .expect_err("someone else's institution");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "Institution not found");
}
