//! In-memory Contact Request Repository

use kernel::id::{ContactRequestId, UserId};
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::domain::entity::contact_request::ContactRequest;
use crate::domain::repository::ContactRequestRepository;
use crate::error::{ContactError, ContactResult};

#[derive(Debug, Default)]
pub struct MemoryContactRequestRepository {
    requests: RwLock<HashMap<ContactRequestId, ContactRequest>>,
}

impl MemoryContactRequestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.requests.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.read().is_empty()
    }
}

impl ContactRequestRepository for MemoryContactRequestRepository {
    async fn create(&self, request: &ContactRequest) -> ContactResult<()> {
        let mut requests = self.requests.write();
        if requests.contains_key(&request.contact_request_id) {
            return Err(ContactError::Internal(format!(
                "Duplicate contact request id {}",
                request.contact_request_id
            )));
        }
        requests.insert(request.contact_request_id, request.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ContactRequestId) -> ContactResult<Option<ContactRequest>> {
        Ok(self.requests.read().get(id).cloned())
    }

    async fn list_by_artist(&self, artist_id: &UserId) -> ContactResult<Vec<ContactRequest>> {
        let mut list: Vec<ContactRequest> = self
            .requests
            .read()
            .values()
            .filter(|r| &r.artist_id == artist_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    async fn save_response(&self, request: &ContactRequest) -> ContactResult<bool> {
        let mut requests = self.requests.write();
        match requests.get_mut(&request.contact_request_id) {
            Some(stored) if stored.status.is_pending() => {
                stored.status = request.status;
                stored.responded_at = request.responded_at;
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(ContactError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::contact_request::NewContactRequest;
    use crate::domain::value_object::contact_status::ContactStatus;
    use chrono::Duration;

    fn request(artist_id: UserId, minutes_ago: i64) -> ContactRequest {
        let mut request = ContactRequest::new(NewContactRequest {
            artist_id,
            client_name: "Nina".to_string(),
            client_email: "nina@example.com".to_string(),
            client_phone: None,
            message: "Botanical piece for the forearm".to_string(),
            body_placement: None,
            budget_eur: None,
        });
        request.created_at -= Duration::minutes(minutes_ago);
        request
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_per_artist() {
        let repo = MemoryContactRequestRepository::new();
        let artist = UserId::new();

        let old = request(artist, 30);
        let new = request(artist, 1);
        let other = request(UserId::new(), 0);
        repo.create(&old).await.unwrap();
        repo.create(&new).await.unwrap();
        repo.create(&other).await.unwrap();

        let list = repo.list_by_artist(&artist).await.unwrap();
        let ids: Vec<_> = list.iter().map(|r| r.contact_request_id).collect();
        assert_eq!(ids, vec![new.contact_request_id, old.contact_request_id]);
    }

    #[tokio::test]
    async fn test_save_response_only_once() {
        let repo = MemoryContactRequestRepository::new();
        let mut stored = request(UserId::new(), 0);
        repo.create(&stored).await.unwrap();

        stored.respond(ContactStatus::Accepted).unwrap();
        assert!(repo.save_response(&stored).await.unwrap());

        let mut stale = stored.clone();
        stale.status = ContactStatus::Declined;
        assert!(!repo.save_response(&stale).await.unwrap());

        let found = repo.find_by_id(&stored.contact_request_id).await.unwrap().unwrap();
        assert_eq!(found.status, ContactStatus::Accepted);
    }

    #[tokio::test]
    async fn test_save_response_unknown_id() {
        let repo = MemoryContactRequestRepository::new();
        let err = repo.save_response(&request(UserId::new(), 0)).await.unwrap_err();
        assert!(matches!(err, ContactError::NotFound));
    }
}
