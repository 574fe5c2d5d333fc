//! Registration, credential checks and token handling.

use std::sync::Arc;

use domains::{
    DomainError, Identity, NewUser, PasswordHasher, Result, TokenService, User, UserId,
    UserRepository,
};
use tracing::{debug, info};

use crate::present;

/// Fields of the registration form, as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Creates an account. All three fields are required.
    pub async fn register(&self, registration: Registration) -> Result<UserId> {
        let (Some(name), Some(email), Some(password)) = (
            present(registration.name),
            present(registration.email),
            present(registration.password),
        ) else {
            return Err(DomainError::Validation(
                "nombre, email and password are required".to_string(),
            ));
        };

        let password_hash = self.hasher.hash(&password)?;
        let id = self
            .users
            .insert(NewUser {
                name,
                email: email.trim().to_string(),
                password_hash,
            })
            .await?;

        info!(user_id = id, "user registered");
        Ok(id)
    }

    /// Looks up the user owning `email` and checks `password` against the stored hash.
    ///
    /// Missing credentials, an unknown email and a wrong password all yield `Ok(None)`.
    pub async fn authenticate(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<Option<User>> {
        let (Some(email), Some(password)) = (email, password) else {
            return Ok(None);
        };

        let Some(user) = self.users.find_by_email(email.trim()).await? else {
            debug!("login attempt for unknown email");
            return Ok(None);
        };

        if self.hasher.verify(password, &user.password_hash) {
            Ok(Some(user))
        } else {
            debug!(user_id = user.id, "login attempt with wrong password");
            Ok(None)
        }
    }

    pub fn issue_token(&self, user: &User) -> Result<String> {
        self.tokens.issue(&user.identity())
    }

    pub fn identify(&self, token: &str) -> Result<Identity> {
        self.tokens.verify(token)
    }
}
