//! Repository Traits

use kernel::id::{ContactRequestId, UserId};

use crate::domain::entity::contact_request::ContactRequest;
use crate::error::ContactResult;

/// Contact request repository trait
#[trait_variant::make(ContactRequestRepository: Send)]
pub trait LocalContactRequestRepository {
    /// Insert a new request
    async fn create(&self, request: &ContactRequest) -> ContactResult<()>;

    /// Find request by ID
    async fn find_by_id(&self, id: &ContactRequestId) -> ContactResult<Option<ContactRequest>>;

    /// All requests addressed to an artist, newest first
    async fn list_by_artist(&self, artist_id: &UserId) -> ContactResult<Vec<ContactRequest>>;

    /// Persist `status` and `responded_at`, only if the stored request is
    /// still pending. Returns false when it was answered in the meantime.
    async fn save_response(&self, request: &ContactRequest) -> ContactResult<bool>;
}
