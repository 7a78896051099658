//! Users and credential forms.

use rust_decimal::Decimal;

use crate::domain::error::FinanceError;

pub type UserId = i64;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub cash: Decimal,
}

/// A submitted registration form.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
}

impl Registration {
    pub fn parse(
        username: Option<&str>,
        password: Option<&str>,
        confirmation: Option<&str>,
    ) -> Result<Self, FinanceError> {
        let username = required(username, "username")?.trim();
        if username.is_empty() {
            return Err(FinanceError::MissingField { field: "username" });
        }
        let password = required(password, "password")?;
        let confirmation = required(confirmation, "confirmation")?;
        if password != confirmation {
            return Err(FinanceError::PasswordMismatch);
        }
        Ok(Registration {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

/// A submitted login form.
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn parse(username: Option<&str>, password: Option<&str>) -> Result<Self, FinanceError> {
        let username = required(username, "username")?.trim();
        if username.is_empty() {
            return Err(FinanceError::MissingField { field: "username" });
        }
        let password = required(password, "password")?;
        Ok(LoginForm {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, FinanceError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(FinanceError::MissingField { field }),
    }
}
