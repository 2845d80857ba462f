//! Contact Routers
//!
//! Split in two so the API binary can give the public submission endpoint a
//! stricter rate limit than the artist inbox.

use auth::UserRepository;
use axum::{
    Router,
    routing::{get, post},
};

use crate::domain::repository::ContactRequestRepository;
use crate::presentation::handlers::{self, ContactAppState};

/// `POST /contact-requests`, relative to the `/api` mount point
pub fn submission_router<C, U>(state: ContactAppState<C, U>) -> Router
where
    C: ContactRequestRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/contact-requests", post(handlers::submit::<C, U>))
        .with_state(state)
}

/// Reading and answering requests, relative to the `/api` mount point
///
/// These routes perform no authentication: any caller can read client
/// contact details and accept or decline a request. Mount them only behind
/// an authenticating proxy or on an internal listener.
pub fn inbox_router<C, U>(state: ContactAppState<C, U>) -> Router
where
    C: ContactRequestRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/contact-requests/{id}",
            get(handlers::get::<C, U>).patch(handlers::respond::<C, U>),
        )
        .route(
            "/artists/{artist_id}/contact-requests",
            get(handlers::list_for_artist::<C, U>),
        )
        .with_state(state)
}
