//! Application Layer

pub mod get;
pub mod list_artist;
pub mod respond;
pub mod submit;

pub use get::GetContactRequestUseCase;
pub use list_artist::ListArtistContactRequestsUseCase;
pub use respond::RespondToContactRequestUseCase;
pub use submit::{SubmitContactRequestInput, SubmitContactRequestUseCase};

use auth::UserRepository;
use kernel::id::UserId;

use crate::error::{ContactError, ContactResult};

/// Fails with `ArtistNotFound` unless `artist_id` is a registered artist
pub(crate) async fn ensure_artist<U>(users: &U, artist_id: &UserId) -> ContactResult<()>
where
    U: UserRepository + Sync,
{
    match users.find_by_id(artist_id).await? {
        Some(user) if user.is_artist() => Ok(()),
        _ => Err(ContactError::ArtistNotFound),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use auth::application::{RegisterInput, RegisterUseCase};
    use auth::models::{User, UserRole};
    use auth::{AuthConfig, MemoryUserRepository};
    use std::sync::Arc;

    pub async fn register(users: &Arc<MemoryUserRepository>, email: &str, role: UserRole) -> User {
        RegisterUseCase::new(users.clone(), Arc::new(AuthConfig::default()))
            .execute(RegisterInput {
                display_name: "Test User".to_string(),
                email: email.to_string(),
                password: "Geometric-Wolf-31".to_string(),
                role,
            })
            .await
            .unwrap()
    }
}
