//! Web server adapter.
//!
//! Axum router with server-rendered pages. Sessions are signed cookies
//! backed by an in-memory store; authentication goes through axum-login
//! against the ledger's users table.

mod auth;
mod error;
mod handlers;
mod templates;

pub use auth::{AuthSession, Backend, SessionUser, hash_password};
pub use error::WebError;

use axum::{
    Router,
    http::{HeaderValue, header},
    routing::get,
};
use axum_login::{AuthManagerLayerBuilder, login_required};
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::Key};
use tracing::warn;

use crate::domain::error::FinanceError;
use crate::ports::config_port::ConfigPort;
use crate::ports::ledger_port::LedgerPort;
use crate::ports::quote_port::QuotePort;

/// Minimum length of `[auth] session_secret` once hex-decoded.
const SESSION_KEY_BYTES: usize = 64;

pub struct AppState {
    pub ledger: Arc<dyn LedgerPort + Send + Sync>,
    pub quotes: Arc<dyn QuotePort + Send + Sync>,
    pub config: Arc<dyn ConfigPort + Send + Sync>,
}

pub fn build_router(state: AppState) -> Result<Router, FinanceError> {
    let key = session_key(&*state.config)?;
    let lifetime = state.config.get_int("auth", "session_lifetime", 0);
    let expiry = if lifetime > 0 {
        Expiry::OnInactivity(time::Duration::seconds(lifetime))
    } else {
        Expiry::OnSessionEnd
    };
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(state.config.get_bool("web", "secure_cookies", false))
        .with_expiry(expiry)
        .with_signed(key);

    let backend = Backend::new(Arc::clone(&state.ledger));
    let auth_layer = AuthManagerLayerBuilder::new(backend, session_layer).build();

    let router = Router::new()
        .route("/", get(handlers::index))
        .route("/quote", get(handlers::quote_form).post(handlers::quote))
        .route("/buy", get(handlers::buy_form).post(handlers::buy))
        .route("/sell", get(handlers::sell_form).post(handlers::sell))
        .route("/history", get(handlers::history))
        .route_layer(login_required!(Backend, login_url = "/login"))
        .route(
            "/register",
            get(handlers::register_form).post(handlers::register),
        )
        .route("/login", get(handlers::login_form).post(handlers::login))
        .route("/logout", get(handlers::logout).post(handlers::logout))
        .fallback(handlers::not_found)
        .layer(auth_layer)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::EXPIRES,
            HeaderValue::from_static("0"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        .with_state(Arc::new(state));

    Ok(router)
}

fn session_key(config: &dyn ConfigPort) -> Result<Key, FinanceError> {
    let Some(secret) = config.get_string("auth", "session_secret") else {
        warn!("no [auth] session_secret configured; sessions will not survive a restart");
        return Ok(Key::generate());
    };

    let invalid = |reason: String| FinanceError::ConfigInvalid {
        section: "auth".into(),
        key: "session_secret".into(),
        reason,
    };
    let bytes = hex::decode(secret.trim()).map_err(|e| invalid(e.to_string()))?;
    if bytes.len() < SESSION_KEY_BYTES {
        return Err(invalid(format!(
            "need at least {SESSION_KEY_BYTES} bytes, got {}",
            bytes.len()
        )));
    }
    Key::try_from(bytes.as_slice()).map_err(|e| invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SecretConfig(Option<&'static str>);

    impl ConfigPort for SecretConfig {
        fn get_string(&self, section: &str, key: &str) -> Option<String> {
            match (section, key) {
                ("auth", "session_secret") => self.0.map(str::to_string),
                _ => None,
            }
        }
        fn get_int(&self, _section: &str, _key: &str, default: i64) -> i64 {
            default
        }
        fn get_bool(&self, _section: &str, _key: &str, default: bool) -> bool {
            default
        }
    }

    #[test]
    fn missing_secret_generates_key() {
        assert!(session_key(&SecretConfig(None)).is_ok());
    }

    #[test]
    fn short_secret_is_rejected() {
        let result = session_key(&SecretConfig(Some("deadbeef")));
        assert!(matches!(result, Err(FinanceError::ConfigInvalid { .. })));
    }

    #[test]
    fn non_hex_secret_is_rejected() {
        let result = session_key(&SecretConfig(Some("not hex at all")));
        assert!(matches!(result, Err(FinanceError::ConfigInvalid { .. })));
    }

    #[test]
    fn full_length_secret_is_accepted() {
        let secret: &'static str = Box::leak("ab".repeat(SESSION_KEY_BYTES).into_boxed_str());
        assert!(session_key(&SecretConfig(Some(secret))).is_ok());
    }
}
