//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{ContactRequestId, UserId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::contact_request::ContactRequest;
use crate::domain::repository::ContactRequestRepository;
use crate::domain::value_object::{contact_status::ContactStatus, phone::PhoneNumber};
use crate::error::{ContactError, ContactResult};

#[derive(Clone)]
pub struct PgContactRequestRepository {
    pool: PgPool,
}

impl PgContactRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_CONTACT_REQUEST: &str = r#"
    SELECT
        contact_request_id,
        artist_id,
        client_name,
        client_email,
        client_phone,
        message,
        body_placement,
        budget_eur,
        status,
        created_at,
        responded_at
    FROM contact_requests
"#;

impl ContactRequestRepository for PgContactRequestRepository {
    async fn create(&self, request: &ContactRequest) -> ContactResult<()> {
        let budget_eur = request.budget_eur.map(i32::try_from).transpose().map_err(|_| {
            ContactError::InvalidInput("Budget is out of range".to_string())
        })?;

        sqlx::query(
            r#"
            INSERT INTO contact_requests (
                contact_request_id,
                artist_id,
                client_name,
                client_email,
                client_phone,
                message,
                body_placement,
                budget_eur,
                status,
                created_at,
                responded_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(request.contact_request_id.as_uuid())
        .bind(request.artist_id.as_uuid())
        .bind(&request.client_name)
        .bind(&request.client_email)
        .bind(request.client_phone.as_ref().map(PhoneNumber::as_str))
        .bind(&request.message)
        .bind(request.body_placement.as_deref())
        .bind(budget_eur)
        .bind(request.status.id())
        .bind(request.created_at)
        .bind(request.responded_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &ContactRequestId) -> ContactResult<Option<ContactRequest>> {
        let row = sqlx::query_as::<_, ContactRequestRow>(&format!(
            "{SELECT_CONTACT_REQUEST} WHERE contact_request_id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_contact_request()).transpose()
    }

    async fn list_by_artist(&self, artist_id: &UserId) -> ContactResult<Vec<ContactRequest>> {
        let rows = sqlx::query_as::<_, ContactRequestRow>(&format!(
            "{SELECT_CONTACT_REQUEST} WHERE artist_id = $1 ORDER BY created_at DESC"
        ))
        .bind(artist_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|r| r.into_contact_request())
            .collect()
    }

    async fn save_response(&self, request: &ContactRequest) -> ContactResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE contact_requests SET
                status = $2,
                responded_at = $3
            WHERE contact_request_id = $1 AND status = $4
            "#,
        )
        .bind(request.contact_request_id.as_uuid())
        .bind(request.status.id())
        .bind(request.responded_at)
        .bind(ContactStatus::Pending.id())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated == 1)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct ContactRequestRow {
    contact_request_id: Uuid,
    artist_id: Uuid,
    client_name: String,
    client_email: String,
    client_phone: Option<String>,
    message: String,
    body_placement: Option<String>,
    budget_eur: Option<i32>,
    status: i16,
    created_at: DateTime<Utc>,
    responded_at: Option<DateTime<Utc>>,
}

impl ContactRequestRow {
    fn into_contact_request(self) -> ContactResult<ContactRequest> {
        let status = ContactStatus::from_id(self.status).ok_or_else(|| {
            ContactError::Internal(format!("Invalid status in database: {}", self.status))
        })?;
        let budget_eur = self
            .budget_eur
            .map(u32::try_from)
            .transpose()
            .map_err(|_| ContactError::Internal("Negative budget in database".to_string()))?;

        Ok(ContactRequest {
            contact_request_id: ContactRequestId::from_uuid(self.contact_request_id),
            artist_id: UserId::from_uuid(self.artist_id),
            client_name: self.client_name,
            client_email: self.client_email,
            client_phone: self.client_phone.map(PhoneNumber::from_db),
            message: self.message,
            body_placement: self.body_placement,
            budget_eur,
            status,
            created_at: self.created_at,
            responded_at: self.responded_at,
        })
    }
}
