//! HTTP Handlers

use auth::UserRepository;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use kernel::id::{ContactRequestId, UserId};
use kernel::validation::Validate;
use std::sync::Arc;

use crate::application::{
    GetContactRequestUseCase, ListArtistContactRequestsUseCase, RespondToContactRequestUseCase,
    SubmitContactRequestUseCase,
};
use crate::domain::repository::ContactRequestRepository;
use crate::error::{ContactError, ContactResult};
use crate::presentation::dto::{
    ContactRequestForm, ContactRequestListResponse, ContactRequestResponse, RespondRequest,
};

/// Shared state for contact handlers
pub struct ContactAppState<C, U>
where
    C: ContactRequestRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    pub contacts: Arc<C>,
    pub users: Arc<U>,
}

impl<C, U> ContactAppState<C, U>
where
    C: ContactRequestRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(contacts: Arc<C>, users: Arc<U>) -> Self {
        Self { contacts, users }
    }
}

impl<C, U> Clone for ContactAppState<C, U>
where
    C: ContactRequestRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            contacts: self.contacts.clone(),
            users: self.users.clone(),
        }
    }
}

fn parse_id<T>(raw: &str) -> ContactResult<kernel::id::Id<T>> {
    raw.parse()
        .map_err(|_| ContactError::InvalidInput("Invalid identifier".to_string()))
}

/// POST /api/contact-requests
pub async fn submit<C, U>(
    State(state): State<ContactAppState<C, U>>,
    Json(form): Json<ContactRequestForm>,
) -> ContactResult<(StatusCode, Json<ContactRequestResponse>)>
where
    C: ContactRequestRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let input = form.into_input()?;

    let use_case = SubmitContactRequestUseCase::new(state.contacts.clone(), state.users.clone());
    let request = use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ContactRequestResponse::new(&request)),
    ))
}

/// GET /api/contact-requests/{id}
pub async fn get<C, U>(
    State(state): State<ContactAppState<C, U>>,
    Path(id): Path<String>,
) -> ContactResult<Json<ContactRequestResponse>>
where
    C: ContactRequestRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let id: ContactRequestId = parse_id(&id)?;

    let use_case = GetContactRequestUseCase::new(state.contacts.clone());
    let request = use_case.execute(&id).await?;

    Ok(Json(ContactRequestResponse::new(&request)))
}

/// GET /api/artists/{artist_id}/contact-requests
pub async fn list_for_artist<C, U>(
    State(state): State<ContactAppState<C, U>>,
    Path(artist_id): Path<String>,
) -> ContactResult<Json<ContactRequestListResponse>>
where
    C: ContactRequestRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let artist_id: UserId = parse_id(&artist_id)?;

    let use_case =
        ListArtistContactRequestsUseCase::new(state.contacts.clone(), state.users.clone());
    let requests = use_case.execute(&artist_id).await?;

    Ok(Json(ContactRequestListResponse::new(&requests)))
}

/// PATCH /api/contact-requests/{id}
pub async fn respond<C, U>(
    State(state): State<ContactAppState<C, U>>,
    Path(id): Path<String>,
    Json(req): Json<RespondRequest>,
) -> ContactResult<Json<ContactRequestResponse>>
where
    C: ContactRequestRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let id: ContactRequestId = parse_id(&id)?;
    req.validate()?;
    let status = req
        .decision()
        .ok_or_else(|| ContactError::InvalidInput("Invalid status".to_string()))?;

    let use_case = RespondToContactRequestUseCase::new(state.contacts.clone());
    let request = use_case.execute(&id, status).await?;

    Ok(Json(ContactRequestResponse::new(&request)))
}
