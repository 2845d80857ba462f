//! Login Use Case
//!
//! Checks an email/password pair. No session is issued.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login use case
pub struct LoginUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> LoginUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Unknown email and wrong password both yield `InvalidCredentials`
    pub async fn execute(&self, input: LoginInput) -> AuthResult<User> {
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidCredentials)?;
        let raw_password = RawPassword::for_login(input.password);

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user
            .password_hash
            .verify(&raw_password, self.config.pepper())
        {
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.user_id, "User logged in");

        Ok(user)
    }
}
