//! List Artist Contact Requests Use Case

use auth::UserRepository;
use kernel::id::UserId;
use std::sync::Arc;

use crate::application::ensure_artist;
use crate::domain::entity::contact_request::ContactRequest;
use crate::domain::repository::ContactRequestRepository;
use crate::error::ContactResult;

pub struct ListArtistContactRequestsUseCase<C, U>
where
    C: ContactRequestRepository,
    U: UserRepository,
{
    contact_repo: Arc<C>,
    user_repo: Arc<U>,
}

impl<C, U> ListArtistContactRequestsUseCase<C, U>
where
    C: ContactRequestRepository,
    U: UserRepository + Sync,
{
    pub fn new(contact_repo: Arc<C>, user_repo: Arc<U>) -> Self {
        Self {
            contact_repo,
            user_repo,
        }
    }

    /// Newest first; `ArtistNotFound` for unknown or non-artist users
    pub async fn execute(&self, artist_id: &UserId) -> ContactResult<Vec<ContactRequest>> {
        ensure_artist(self.user_repo.as_ref(), artist_id).await?;
        self.contact_repo.list_by_artist(artist_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::submit::{SubmitContactRequestInput, SubmitContactRequestUseCase};
    use crate::application::test_support::register;
    use crate::error::ContactError;
    use crate::infra::memory::MemoryContactRequestRepository;
    use auth::MemoryUserRepository;
    use auth::models::UserRole;

    #[tokio::test]
    async fn test_lists_only_that_artist() {
        let users = Arc::new(MemoryUserRepository::new());
        let contacts = Arc::new(MemoryContactRequestRepository::new());
        let first = register(&users, "first@blottr.fr", UserRole::Artist).await;
        let second = register(&users, "second@blottr.fr", UserRole::Artist).await;

        let submit = SubmitContactRequestUseCase::new(contacts.clone(), users.clone());
        for artist in [&first, &first, &second] {
            submit
                .execute(SubmitContactRequestInput {
                    artist_id: artist.user_id,
                    client_name: "Jules".to_string(),
                    client_email: "jules@example.com".to_string(),
                    client_phone: None,
                    message: "Japanese sleeve, first session".to_string(),
                    body_placement: None,
                    budget_eur: None,
                })
                .await
                .unwrap();
        }

        let list = ListArtistContactRequestsUseCase::new(contacts, users.clone());
        let requests = list.execute(&first.user_id).await.unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.artist_id == first.user_id));
        assert!(requests[0].created_at >= requests[1].created_at);

        let err = list.execute(&UserId::new()).await.unwrap_err();
        assert!(matches!(err, ContactError::ArtistNotFound));
    }
}
