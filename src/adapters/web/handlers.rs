//! HTTP request handlers for web adapter.

use askama::Template;
use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::broker::Broker;
use crate::domain::error::FinanceError;
use crate::domain::user::{LoginForm, Registration};

use super::auth::{AuthSession, SessionUser, hash_password};
use super::templates::{
    BuyTemplate, HistoryTemplate, IndexTemplate, LoginTemplate, QuoteFormTemplate,
    QuotedTemplate, RegisterTemplate, SellTemplate,
};
use super::{AppState, WebError};

#[derive(Debug, serde::Deserialize)]
pub struct QuoteFormData {
    pub symbol: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct TradeFormData {
    pub symbol: Option<String>,
    pub shares: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct RegisterFormData {
    pub username: Option<String>,
    pub password: Option<String>,
    pub confirmation: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct LoginFormData {
    pub username: Option<String>,
    pub password: Option<String>,
}

fn render(template: &impl Template) -> Result<Response, WebError> {
    let html = template
        .render()
        .map_err(|e| WebError::internal(format!("template error: {e}")))?;
    Ok(Html(html).into_response())
}

/// Protected routes sit behind `login_required!`, so a missing user here
/// means the session vanished mid-request.
fn current_user(auth_session: &AuthSession) -> Result<&SessionUser, WebError> {
    auth_session
        .user
        .as_ref()
        .ok_or_else(|| WebError::new(axum::http::StatusCode::UNAUTHORIZED, "login required"))
}

fn broker(state: &AppState) -> Broker<'_> {
    Broker::new(&*state.ledger, &*state.quotes)
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    auth_session: AuthSession,
) -> Result<Response, WebError> {
    let user = current_user(&auth_session)?;
    let portfolio = broker(&state)
        .portfolio(user.id)
        .map_err(|e| WebError::from(e).for_user())?;
    render(&IndexTemplate::new(&user.username, &portfolio))
}

pub async fn quote_form() -> Result<Response, WebError> {
    render(&QuoteFormTemplate { logged_in: true })
}

pub async fn quote(
    State(state): State<Arc<AppState>>,
    Form(form): Form<QuoteFormData>,
) -> Result<Response, WebError> {
    let quote = broker(&state)
        .quote(form.symbol.as_deref())
        .map_err(|e| WebError::from(e).for_user())?;
    render(&QuotedTemplate::new(&quote))
}

pub async fn buy_form() -> Result<Response, WebError> {
    render(&BuyTemplate { logged_in: true })
}

pub async fn buy(
    State(state): State<Arc<AppState>>,
    auth_session: AuthSession,
    Form(form): Form<TradeFormData>,
) -> Result<Response, WebError> {
    let user = current_user(&auth_session)?;
    broker(&state)
        .buy(user.id, form.symbol.as_deref(), form.shares.as_deref())
        .map_err(|e| WebError::from(e).for_user())?;
    Ok(Redirect::to("/").into_response())
}

pub async fn sell_form(
    State(state): State<Arc<AppState>>,
    auth_session: AuthSession,
) -> Result<Response, WebError> {
    let user = current_user(&auth_session)?;
    let symbols = broker(&state)
        .holdings(user.id)
        .map_err(|e| WebError::from(e).for_user())?
        .into_iter()
        .map(|h| h.symbol)
        .collect();
    render(&SellTemplate {
        logged_in: true,
        symbols,
    })
}

pub async fn sell(
    State(state): State<Arc<AppState>>,
    auth_session: AuthSession,
    Form(form): Form<TradeFormData>,
) -> Result<Response, WebError> {
    let user = current_user(&auth_session)?;
    broker(&state)
        .sell(user.id, form.symbol.as_deref(), form.shares.as_deref())
        .map_err(|e| WebError::from(e).for_user())?;
    Ok(Redirect::to("/").into_response())
}

pub async fn history(
    State(state): State<Arc<AppState>>,
    auth_session: AuthSession,
) -> Result<Response, WebError> {
    let user = current_user(&auth_session)?;
    let transactions = broker(&state)
        .history(user.id)
        .map_err(|e| WebError::from(e).for_user())?;
    render(&HistoryTemplate::new(&transactions))
}

pub async fn register_form() -> Result<Response, WebError> {
    render(&RegisterTemplate { logged_in: false })
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    mut auth_session: AuthSession,
    Form(form): Form<RegisterFormData>,
) -> Result<Response, WebError> {
    let registration = Registration::parse(
        form.username.as_deref(),
        form.password.as_deref(),
        form.confirmation.as_deref(),
    )?;
    let password_hash = hash_password(&registration.password)?;
    let user = state
        .ledger
        .create_user(&registration.username, &password_hash)?;

    auth_session
        .login(&SessionUser::from(user))
        .await
        .map_err(|e| WebError::internal(format!("session error: {e}")))?;

    Ok(Redirect::to("/").into_response())
}

pub async fn login_form() -> Result<Response, WebError> {
    render(&LoginTemplate { logged_in: false })
}

pub async fn login(
    mut auth_session: AuthSession,
    Form(form): Form<LoginFormData>,
) -> Result<Response, WebError> {
    let creds = LoginForm::parse(form.username.as_deref(), form.password.as_deref())?;
    let username = creds.username.clone();

    let user = match auth_session.authenticate(creds).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!(%username, "login rejected");
            return Err(FinanceError::InvalidCredentials.into());
        }
        Err(e) => return Err(WebError::internal(format!("authentication error: {e}"))),
    };

    auth_session
        .login(&user)
        .await
        .map_err(|e| WebError::internal(format!("session error: {e}")))?;

    info!(user_id = user.id, "logged in");
    Ok(Redirect::to("/").into_response())
}

pub async fn logout(mut auth_session: AuthSession) -> Result<Response, WebError> {
    auth_session
        .logout()
        .await
        .map_err(|e| WebError::internal(format!("session error: {e}")))?;
    Ok(Redirect::to("/login").into_response())
}

pub async fn not_found() -> WebError {
    WebError::not_found("Page not found")
}
