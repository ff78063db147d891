use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::validation::{
    parse_dob, require, validate_age, validate_email_format, validate_password,
    validate_username_format, Violations,
};
use super::ServiceError;
use crate::auth::{PasswordError, PasswordHasher, TokenService};
use crate::database::models::{NewUser, User, UserChanges};
use crate::database::repositories::users::USER_NOT_FOUND;
use crate::database::repositories::UserRepository;

#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub dob: Option<String>,
    pub age: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditUserRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Account lifecycle: signup, login, profile reads and edits
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    passwords: PasswordHasher,
    tokens: Arc<TokenService>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: PasswordHasher, tokens: Arc<TokenService>) -> Self {
        Self { users, passwords, tokens }
    }

    pub async fn sign_up(&self, req: SignUpRequest) -> Result<TokenResponse, ServiceError> {
        let mut violations = Violations::new();
        violations.check(validate_username_format(&req.username));
        violations.check(validate_email_format(&req.email));
        violations.check(validate_password(&req.password));
        violations.check(validate_age(req.age));
        let dob = match parse_dob(req.dob.as_deref()) {
            Ok(dob) => dob,
            Err(msg) => {
                violations.check(Err(msg));
                None
            }
        };
        violations.into_result()?;

        let password_hash = self.hash_password(req.password).await?;
        let user = self
            .users
            .create(NewUser {
                username: req.username,
                email: req.email,
                password_hash,
                dob,
                age: req.age,
            })
            .await?;

        info!("Registered user {} ({})", user.id, user.username);
        let token = self.tokens.issue(&user.identity())?;
        Ok(TokenResponse { token })
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, req: LoginRequest) -> Result<TokenResponse, ServiceError> {
        let mut violations = Violations::new();
        violations.check(require("email", &req.email));
        violations.check(require("password", &req.password));
        violations.into_result()?;

        let Some(user) = self.users.find_by_email(&req.email).await? else {
            warn!("Login failed: unknown email");
            return Err(ServiceError::InvalidCredentials);
        };

        match self.verify_password(user.password.clone(), req.password).await {
            Ok(()) => {}
            Err(ServiceError::Password(PasswordError::Mismatch)) => {
                warn!("Login failed for user {}: wrong password", user.id);
                return Err(ServiceError::InvalidCredentials);
            }
            Err(other) => return Err(other),
        }

        let token = self.tokens.issue(&user.identity())?;
        Ok(TokenResponse { token })
    }

    pub async fn list(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.users.list().await?)
    }

    pub async fn get(&self, id: i64) -> Result<User, ServiceError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(USER_NOT_FOUND))
    }

    pub async fn edit(&self, id: i64, req: EditUserRequest) -> Result<User, ServiceError> {
        let mut violations = Violations::new();
        violations.check(validate_username_format(&req.username));
        violations.check(validate_email_format(&req.email));
        violations.into_result()?;

        let user = self
            .users
            .update(
                id,
                UserChanges {
                    username: req.username,
                    email: req.email,
                },
            )
            .await?;
        info!("Updated user {}", id);
        Ok(user)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.users.delete(id).await?;
        info!("Deleted user {}", id);
        Ok(())
    }

    // bcrypt is CPU bound; keep it off the async workers
    async fn hash_password(&self, plaintext: String) -> Result<String, ServiceError> {
        let hasher = self.passwords;
        let hashed = tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| PasswordError::Hash(e.to_string()))??;
        Ok(hashed)
    }

    async fn verify_password(&self, stored_hash: String, plaintext: String) -> Result<(), ServiceError> {
        let hasher = self.passwords;
        tokio::task::spawn_blocking(move || hasher.verify(&stored_hash, &plaintext))
            .await
            .map_err(|e| PasswordError::Hash(e.to_string()))??;
        Ok(())
    }
}
