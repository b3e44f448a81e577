//! Helpers shared by the account, institution and review services.

use tracing::{debug, error, warn};

use crate::domain::ports::{
    ImageFile, ImageUploadError, ImageUploader, UserPersistenceError, UserRepository,
};
use crate::domain::{Error, StoredUser, UserId};

pub(crate) const USER_EXISTS: &str = "User already exists";
pub(crate) const STALE_IDENTITY: &str = "Unauthorized - User not found";

pub(crate) fn map_user_error(err: UserPersistenceError) -> Error {
    match err {
        UserPersistenceError::DuplicateEmail { .. } => Error::invalid_request(USER_EXISTS),
        UserPersistenceError::Connection { message } | UserPersistenceError::Query { message } => {
            error!(%message, "user store failure");
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

/// Load the acting user, rejecting tokens whose subject has been deleted.
pub(crate) async fn require_actor<U>(users: &U, actor: &UserId) -> Result<StoredUser, Error>
where
    U: UserRepository + ?Sized,
{
    match users.find_by_id(actor).await.map_err(map_user_error)? {
        Some(user) => Ok(user),
        None => {
            debug!(user_id = %actor, "token subject no longer exists");
            Err(Error::unauthorized(STALE_IDENTITY))
        }
    }
}

/// Upload `files` before anything is written. No files means no call.
pub(crate) async fn upload_images(
    uploader: &dyn ImageUploader,
    files: Vec<ImageFile>,
) -> Result<Vec<String>, Error> {
    if files.is_empty() {
        return Ok(Vec::new());
    }
    let count = files.len();
    uploader.upload_all(files).await.map_err(|err| {
        error!(error = %err, count, "image upload failed");
        match err {
            ImageUploadError::NotConfigured => {
                Error::upload_failed("Image uploads are not configured")
            }
            ImageUploadError::Transport { .. } | ImageUploadError::Rejected { .. } => {
                Error::upload_failed("Image upload failed")
            }
        }
    })
}

/// Pass `outcome` through, logging `urls` when the write they were uploaded
/// for did not happen.
///
/// Uploads run before the owner-filtered write, so a miss or store failure
/// leaves them on the image host. Nothing deletes them remotely.
pub(crate) fn warn_if_orphaned<T>(outcome: Result<T, Error>, urls: &[String]) -> Result<T, Error> {
    if outcome.is_err() && !urls.is_empty() {
        warn!(count = urls.len(), ?urls, "uploaded images not attached to any record");
    }
    outcome
}
