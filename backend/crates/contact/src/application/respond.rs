//! Respond To Contact Request Use Case

use kernel::id::ContactRequestId;
use std::sync::Arc;

use crate::domain::entity::contact_request::ContactRequest;
use crate::domain::repository::ContactRequestRepository;
use crate::domain::value_object::contact_status::ContactStatus;
use crate::error::{ContactError, ContactResult};

pub struct RespondToContactRequestUseCase<C>
where
    C: ContactRequestRepository,
{
    contact_repo: Arc<C>,
}

impl<C> RespondToContactRequestUseCase<C>
where
    C: ContactRequestRepository,
{
    pub fn new(contact_repo: Arc<C>) -> Self {
        Self { contact_repo }
    }

    /// Accept or decline a pending request; 409 once it has been answered
    pub async fn execute(
        &self,
        id: &ContactRequestId,
        status: ContactStatus,
    ) -> ContactResult<ContactRequest> {
        let mut request = self
            .contact_repo
            .find_by_id(id)
            .await?
            .ok_or(ContactError::NotFound)?;

        request.respond(status)?;

        if !self.contact_repo.save_response(&request).await? {
            // Answered concurrently; report what is stored now
            let current = self
                .contact_repo
                .find_by_id(id)
                .await?
                .ok_or(ContactError::NotFound)?;
            return Err(ContactError::AlreadyResponded(current.status));
        }

        tracing::info!(
            contact_request_id = %request.contact_request_id,
            status = %request.status,
            "Contact request answered"
        );

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::contact_request::NewContactRequest;
    use crate::infra::memory::MemoryContactRequestRepository;
    use kernel::id::UserId;

    async fn stored(repo: &MemoryContactRequestRepository) -> ContactRequestId {
        let request = ContactRequest::new(NewContactRequest {
            artist_id: UserId::new(),
            client_name: "Lou".to_string(),
            client_email: "lou@example.com".to_string(),
            client_phone: None,
            message: "Cover-up on the ankle, about 8cm".to_string(),
            body_placement: Some("ankle".to_string()),
            budget_eur: Some(250),
        });
        repo.create(&request).await.unwrap();
        request.contact_request_id
    }

    #[tokio::test]
    async fn test_accept_then_decline_conflicts() {
        let repo = Arc::new(MemoryContactRequestRepository::new());
        let id = stored(&repo).await;
        let use_case = RespondToContactRequestUseCase::new(repo.clone());

        let accepted = use_case.execute(&id, ContactStatus::Accepted).await.unwrap();
        assert_eq!(accepted.status, ContactStatus::Accepted);

        let err = use_case
            .execute(&id, ContactStatus::Declined)
            .await
            .unwrap_err();
        assert!(matches!(err, ContactError::AlreadyResponded(ContactStatus::Accepted)));
    }

    #[tokio::test]
    async fn test_unknown_request() {
        let use_case = RespondToContactRequestUseCase::new(Arc::new(MemoryContactRequestRepository::new()));
        let err = use_case
            .execute(&ContactRequestId::new(), ContactStatus::Accepted)
            .await
            .unwrap_err();
        assert!(matches!(err, ContactError::NotFound));
    }
}
