//! Authentication backend for axum-login.
//!
//! Users live in the ledger; passwords are stored as argon2id PHC strings.

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use axum_login::{AuthUser, AuthnBackend, UserId};
use rand::rngs::OsRng;
use std::sync::Arc;

use crate::domain::error::FinanceError;
use crate::domain::user::{LoginForm, User};
use crate::ports::ledger_port::LedgerPort;

pub type AuthSession = axum_login::AuthSession<Backend>;

/// The logged-in user as carried by the session.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
    /// The password hash string as bytes, used by axum-login to validate sessions.
    pw_hash_bytes: Vec<u8>,
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            pw_hash_bytes: user.password_hash.into_bytes(),
        }
    }
}

impl AuthUser for SessionUser {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }

    fn session_auth_hash(&self) -> &[u8] {
        &self.pw_hash_bytes
    }
}

#[derive(Clone)]
pub struct Backend {
    ledger: Arc<dyn LedgerPort + Send + Sync>,
}

impl Backend {
    pub fn new(ledger: Arc<dyn LedgerPort + Send + Sync>) -> Self {
        Self { ledger }
    }
}

impl AuthnBackend for Backend {
    type User = SessionUser;
    type Credentials = LoginForm;
    type Error = FinanceError;

    async fn authenticate(
        &self,
        creds: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        let Some(user) = self.ledger.find_user(&creds.username)? else {
            return Ok(None);
        };

        if verify_password(&creds.password, &user.password_hash) {
            Ok(Some(user.into()))
        } else {
            Ok(None)
        }
    }

    async fn get_user(&self, user_id: &UserId<Self>) -> Result<Option<Self::User>, Self::Error> {
        Ok(self.ledger.get_user(*user_id)?.map(SessionUser::from))
    }
}

pub fn hash_password(password: &str) -> Result<String, FinanceError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default());
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| FinanceError::PasswordHash {
            reason: e.to_string(),
        })
}

/// False for a wrong password and for a stored hash that does not parse.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
