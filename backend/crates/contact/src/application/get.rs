//! Get Contact Request Use Case

use kernel::id::ContactRequestId;
use std::sync::Arc;

use crate::domain::entity::contact_request::ContactRequest;
use crate::domain::repository::ContactRequestRepository;
use crate::error::{ContactError, ContactResult};

pub struct GetContactRequestUseCase<C>
where
    C: ContactRequestRepository,
{
    contact_repo: Arc<C>,
}

impl<C> GetContactRequestUseCase<C>
where
    C: ContactRequestRepository,
{
    pub fn new(contact_repo: Arc<C>) -> Self {
        Self { contact_repo }
    }

    pub async fn execute(&self, id: &ContactRequestId) -> ContactResult<ContactRequest> {
        self.contact_repo
            .find_by_id(id)
            .await?
            .ok_or(ContactError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::MemoryContactRequestRepository;

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let use_case = GetContactRequestUseCase::new(Arc::new(MemoryContactRequestRepository::new()));
        let err = use_case.execute(&ContactRequestId::new()).await.unwrap_err();
        assert!(matches!(err, ContactError::NotFound));
    }
}
