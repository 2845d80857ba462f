//! Submit Contact Request Use Case

use auth::UserRepository;
use kernel::id::UserId;
use std::sync::Arc;

use crate::application::ensure_artist;
use crate::domain::entity::contact_request::{ContactRequest, NewContactRequest};
use crate::domain::repository::ContactRequestRepository;
use crate::domain::value_object::phone::PhoneNumber;
use crate::error::ContactResult;

/// Submit input, already validated by the form
#[derive(Debug)]
pub struct SubmitContactRequestInput {
    pub artist_id: UserId,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: Option<String>,
    pub message: String,
    pub body_placement: Option<String>,
    pub budget_eur: Option<u32>,
}

pub struct SubmitContactRequestUseCase<C, U>
where
    C: ContactRequestRepository,
    U: UserRepository,
{
    contact_repo: Arc<C>,
    user_repo: Arc<U>,
}

impl<C, U> SubmitContactRequestUseCase<C, U>
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

    pub async fn execute(&self, input: SubmitContactRequestInput) -> ContactResult<ContactRequest> {
        ensure_artist(self.user_repo.as_ref(), &input.artist_id).await?;

        let client_phone = non_blank(input.client_phone)
            .map(PhoneNumber::new)
            .transpose()?;

        let request = ContactRequest::new(NewContactRequest {
            artist_id: input.artist_id,
            client_name: input.client_name.trim().to_string(),
            client_email: input.client_email.trim().to_lowercase(),
            client_phone,
            message: input.message.trim().to_string(),
            body_placement: non_blank(input.body_placement),
            budget_eur: input.budget_eur,
        });

        self.contact_repo.create(&request).await?;

        tracing::info!(
            contact_request_id = %request.contact_request_id,
            artist_id = %request.artist_id,
            "Contact request submitted"
        );

        Ok(request)
    }
}

/// Trimmed value, or `None` when absent or blank
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::register;
    use crate::domain::value_object::contact_status::ContactStatus;
    use crate::error::ContactError;
    use crate::infra::memory::MemoryContactRequestRepository;
    use auth::MemoryUserRepository;
    use auth::models::UserRole;

    fn input(artist_id: UserId) -> SubmitContactRequestInput {
        SubmitContactRequestInput {
            artist_id,
            client_name: "  Maya  ".to_string(),
            client_email: "Maya@Example.com".to_string(),
            client_phone: Some("   ".to_string()),
            message: "Fine line peony on the shoulder blade".to_string(),
            body_placement: Some(" shoulder ".to_string()),
            budget_eur: Some(300),
        }
    }

    #[tokio::test]
    async fn test_submit_to_artist() {
        let users = Arc::new(MemoryUserRepository::new());
        let contacts = Arc::new(MemoryContactRequestRepository::new());
        let artist = register(&users, "artist@blottr.fr", UserRole::Artist).await;

        let request = SubmitContactRequestUseCase::new(contacts.clone(), users)
            .execute(input(artist.user_id))
            .await
            .unwrap();

        assert_eq!(request.status, ContactStatus::Pending);
        assert_eq!(request.client_name, "Maya");
        assert_eq!(request.client_email, "maya@example.com");
        assert_eq!(request.client_phone, None);
        assert_eq!(request.body_placement.as_deref(), Some("shoulder"));
        assert_eq!(contacts.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_to_client_is_artist_not_found() {
        let users = Arc::new(MemoryUserRepository::new());
        let contacts = Arc::new(MemoryContactRequestRepository::new());
        let client = register(&users, "client@blottr.fr", UserRole::Client).await;

        let use_case = SubmitContactRequestUseCase::new(contacts.clone(), users);
        let err = use_case.execute(input(client.user_id)).await.unwrap_err();
        assert!(matches!(err, ContactError::ArtistNotFound));

        let err = use_case.execute(input(UserId::new())).await.unwrap_err();
        assert!(matches!(err, ContactError::ArtistNotFound));
        assert!(contacts.is_empty());
    }
}
