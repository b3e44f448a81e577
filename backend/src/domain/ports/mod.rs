//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod image_uploader;
mod institution_command;
mod institution_repository;
mod password_hasher;
mod review_command;
mod review_repository;
mod user_repository;

pub use account_command::{AccountCommand, AccountQuery, AuthSession};
#[cfg(test)]
pub use image_uploader::MockImageUploader;
pub use image_uploader::{ImageFile, ImageUploadError, ImageUploader};
pub use institution_command::{
    CreateInstitutionRequest, InstitutionCommand, InstitutionQuery, UpdateInstitutionRequest,
};
#[cfg(test)]
pub use institution_repository::MockInstitutionRepository;
pub use institution_repository::{InstitutionRepository, InstitutionRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use review_command::{CreateReviewRequest, ReviewCommand, ReviewQuery, UpdateReviewRequest};
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{ReviewRepository, ReviewRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
