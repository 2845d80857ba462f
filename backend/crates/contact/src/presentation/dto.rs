//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::{ContactRequestId, UserId};
use kernel::validation::{Validate, ValidationErrors, check_email, check_length};
use serde::{Deserialize, Serialize};

use crate::application::SubmitContactRequestInput;
use crate::domain::entity::contact_request::{
    BUDGET_MAX_EUR, BUDGET_MIN_EUR, ContactRequest, MESSAGE_MAX_LENGTH, MESSAGE_MIN_LENGTH,
};
use crate::domain::value_object::{contact_status::ContactStatus, phone::PhoneNumber};
use crate::error::{ContactError, ContactResult};

const NAME_MIN_LENGTH: usize = 2;
const NAME_MAX_LENGTH: usize = 100;
const BODY_PLACEMENT_MAX_LENGTH: usize = 100;

// ============================================================================
// Submit
// ============================================================================

/// Contact form sent by a client from an artist's page
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactRequestForm {
    pub artist_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub body_placement: Option<String>,
    pub budget_eur: Option<i64>,
}

impl Validate for ContactRequestForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let artist_id = self.artist_id.trim();
        if artist_id.is_empty() {
            errors.add("artistId", "Artist is required");
        } else if artist_id.parse::<UserId>().is_err() {
            errors.add("artistId", "Artist identifier is invalid");
        }

        check_length(&mut errors, "name", "Name", &self.name, NAME_MIN_LENGTH, NAME_MAX_LENGTH);
        check_email(&mut errors, "email", &self.email);

        if let Some(phone) = self.phone.as_deref().map(str::trim) {
            if !phone.is_empty() && !PhoneNumber::is_valid(phone) {
                errors.add("phone", "Phone number is invalid");
            }
        }

        check_length(
            &mut errors,
            "message",
            "Message",
            &self.message,
            MESSAGE_MIN_LENGTH,
            MESSAGE_MAX_LENGTH,
        );

        if let Some(placement) = &self.body_placement {
            check_length(
                &mut errors,
                "bodyPlacement",
                "Body placement",
                placement,
                0,
                BODY_PLACEMENT_MAX_LENGTH,
            );
        }

        if let Some(budget) = self.budget_eur {
            if !(i64::from(BUDGET_MIN_EUR)..=i64::from(BUDGET_MAX_EUR)).contains(&budget) {
                errors.add(
                    "budgetEur",
                    format!("Budget must be between {BUDGET_MIN_EUR} and {BUDGET_MAX_EUR} euros"),
                );
            }
        }

        errors.into_result()
    }
}

impl ContactRequestForm {
    /// Validate, then convert to use case input
    pub fn into_input(self) -> ContactResult<SubmitContactRequestInput> {
        self.validate()?;

        let artist_id = self
            .artist_id
            .trim()
            .parse::<UserId>()
            .map_err(|_| ContactError::InvalidInput("Artist identifier is invalid".to_string()))?;
        let budget_eur = self
            .budget_eur
            .map(u32::try_from)
            .transpose()
            .map_err(|_| ContactError::InvalidInput("Budget is out of range".to_string()))?;

        Ok(SubmitContactRequestInput {
            artist_id,
            client_name: self.name,
            client_email: self.email,
            client_phone: self.phone,
            message: self.message,
            body_placement: self.body_placement,
            budget_eur,
        })
    }
}

// ============================================================================
// Respond
// ============================================================================

/// Artist's answer
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RespondRequest {
    /// `accepted` or `declined`
    pub status: String,
}

impl RespondRequest {
    /// Status after validation
    pub fn decision(&self) -> Option<ContactStatus> {
        ContactStatus::from_code(self.status.trim()).filter(ContactStatus::is_response)
    }
}

impl Validate for RespondRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.decision().is_none() {
            errors.add("status", "Status must be either accepted or declined");
        }
        errors.into_result()
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequestDto {
    pub id: ContactRequestId,
    pub artist_id: UserId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub body_placement: Option<String>,
    pub budget_eur: Option<u32>,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl From<&ContactRequest> for ContactRequestDto {
    fn from(request: &ContactRequest) -> Self {
        Self {
            id: request.contact_request_id,
            artist_id: request.artist_id,
            name: request.client_name.clone(),
            email: request.client_email.clone(),
            phone: request.client_phone.as_ref().map(|p| p.to_string()),
            message: request.message.clone(),
            body_placement: request.body_placement.clone(),
            budget_eur: request.budget_eur,
            status: request.status,
            created_at: request.created_at,
            responded_at: request.responded_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequestResponse {
    pub success: bool,
    pub contact_request: ContactRequestDto,
}

impl ContactRequestResponse {
    pub fn new(request: &ContactRequest) -> Self {
        Self {
            success: true,
            contact_request: request.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequestListResponse {
    pub success: bool,
    pub contact_requests: Vec<ContactRequestDto>,
}

impl ContactRequestListResponse {
    pub fn new(requests: &[ContactRequest]) -> Self {
        Self {
            success: true,
            contact_requests: requests.iter().map(ContactRequestDto::from).collect(),
        }
    }
}
