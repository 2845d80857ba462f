//! Contact Request Entity

use chrono::{DateTime, Utc};
use kernel::id::{ContactRequestId, UserId};

use crate::domain::value_object::{contact_status::ContactStatus, phone::PhoneNumber};
use crate::error::{ContactError, ContactResult};

/// Message length bounds, in characters
pub const MESSAGE_MIN_LENGTH: usize = 10;
pub const MESSAGE_MAX_LENGTH: usize = 2000;

/// Budget bounds, in whole euros
pub const BUDGET_MIN_EUR: u32 = 1;
pub const BUDGET_MAX_EUR: u32 = 100_000;

#[derive(Debug, Clone)]
pub struct ContactRequest {
    pub contact_request_id: ContactRequestId,
    /// Artist the request is addressed to
    pub artist_id: UserId,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: Option<PhoneNumber>,
    pub message: String,
    pub body_placement: Option<String>,
    pub budget_eur: Option<u32>,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

/// Client-supplied fields of a new request
#[derive(Debug, Clone)]
pub struct NewContactRequest {
    pub artist_id: UserId,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: Option<PhoneNumber>,
    pub message: String,
    pub body_placement: Option<String>,
    pub budget_eur: Option<u32>,
}

impl ContactRequest {
    /// New pending request
    pub fn new(fields: NewContactRequest) -> Self {
        Self {
            contact_request_id: ContactRequestId::new(),
            artist_id: fields.artist_id,
            client_name: fields.client_name,
            client_email: fields.client_email,
            client_phone: fields.client_phone,
            message: fields.message,
            body_placement: fields.body_placement,
            budget_eur: fields.budget_eur,
            status: ContactStatus::Pending,
            created_at: Utc::now(),
            responded_at: None,
        }
    }

    /// Accept or decline. Only a pending request can be answered.
    pub fn respond(&mut self, status: ContactStatus) -> ContactResult<()> {
        if !status.is_response() {
            return Err(ContactError::InvalidInput(format!(
                "Cannot respond with status {status}"
            )));
        }
        if !self.status.is_pending() {
            return Err(ContactError::AlreadyResponded(self.status));
        }

        self.status = status;
        self.responded_at = Some(Utc::now());
        Ok(())
    }
}
