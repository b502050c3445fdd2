use std::sync::Arc;

use tracing::{info, instrument};

use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::user::{NewUser, UserProfile};
use crate::domain::validation::{UserPayload, check_new_user, check_user_update};
use crate::infrastructure::security::{hash_password, verify_password};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user_id: i64,
}

#[derive(Clone)]
pub struct UserService<R: UserRepository + 'static> {
    repo: Arc<R>,
}

impl<R> UserService<R>
where
    R: UserRepository + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list_users(&self) -> Result<Vec<UserProfile>, DomainError> {
        self.repo.list().await
    }

    pub async fn get_user(&self, id: i64) -> Result<UserProfile, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::UserNotFound(id))
    }

    #[instrument(skip_all)]
    pub async fn create_user(&self, payload: UserPayload<'_>) -> Result<UserProfile, DomainError> {
        let (valid, password) = check_new_user(&payload).map_err(DomainError::InvalidInput)?;

        let hash = hash_password(password).map_err(|err| DomainError::Internal(err.to_string()))?;
        self.repo
            .create(NewUser::new(
                valid.name.to_string(),
                valid.email.to_string(),
                hash,
            ))
            .await
    }

    // Existence is checked first so an unknown id is NotFound whatever the payload.
    #[instrument(skip(self, payload))]
    pub async fn update_user(&self, id: i64, payload: UserPayload<'_>) -> Result<(), DomainError> {
        self.get_user(id).await?;

        let valid = check_user_update(&payload).map_err(DomainError::InvalidInput)?;
        if !self.repo.update(id, valid.name, valid.email).await? {
            return Err(DomainError::UserNotFound(id));
        }
        info!(user_id = id, "user updated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: i64) -> Result<(), DomainError> {
        if !self.repo.delete(id).await? {
            return Err(DomainError::UserNotFound(id));
        }
        info!(user_id = id, "user deleted");
        Ok(())
    }

    pub async fn search_users(&self, name: &str) -> Result<Vec<UserProfile>, DomainError> {
        if name.is_empty() {
            return Err(DomainError::invalid_input("Please provide a name to search"));
        }
        self.repo.search_by_name(name).await
    }

    // TODO: verify against a dummy hash when the email is unknown so both failure paths cost the same.
    #[instrument(skip_all)]
    pub async fn login(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<LoginOutcome, DomainError> {
        let (Some(email), Some(password)) = (
            email.filter(|e| !e.is_empty()),
            password.filter(|p| !p.is_empty()),
        ) else {
            return Err(DomainError::invalid_input("Email and password required"));
        };

        let user = self
            .repo
            .find_by_email(email)
            .await?
            .ok_or(DomainError::LoginFailed)?;

        if !verify_password(password, &user.password_hash) {
            return Err(DomainError::LoginFailed);
        }

        info!(user_id = user.id, "user logged in");
        Ok(LoginOutcome { user_id: user.id })
    }
}
