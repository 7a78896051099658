//! Domain error types.

use rust_decimal::Decimal;

use super::money::usd;

/// Top-level error type for finance.
///
/// The first group of variants are rejections shown to the user as-is; the
/// rest are infrastructure failures.
#[derive(Debug, thiserror::Error)]
pub enum FinanceError {
    #[error("missing {field}")]
    MissingField { field: &'static str },

    #[error("invalid symbol: {symbol}")]
    InvalidSymbol { symbol: String },

    #[error("shares must be a positive integer")]
    NonPositiveQuantity,

    #[error("insufficient funds: cost is {}, cash is {}", usd(.cost), usd(.cash))]
    InsufficientFunds { cost: Decimal, cash: Decimal },

    #[error("not enough shares of {symbol}: requested {requested}, held {held}")]
    InsufficientShares {
        symbol: String,
        requested: i64,
        held: i64,
    },

    #[error("selling {symbol} would overflow the cash balance")]
    CashOverflow { symbol: String },

    #[error("username already exists: {username}")]
    DuplicateUsername { username: String },

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("invalid username and/or password")]
    InvalidCredentials,

    #[error("password hashing failed: {reason}")]
    PasswordHash { reason: String },

    #[error("unknown user id {id}")]
    UnknownUser { id: i64 },

    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FinanceError {
    /// True for rejections caused by user input rather than by the system.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            FinanceError::MissingField { .. }
                | FinanceError::InvalidSymbol { .. }
                | FinanceError::NonPositiveQuantity
                | FinanceError::InsufficientFunds { .. }
                | FinanceError::InsufficientShares { .. }
                | FinanceError::CashOverflow { .. }
                | FinanceError::DuplicateUsername { .. }
                | FinanceError::PasswordMismatch
                | FinanceError::InvalidCredentials
        )
    }
}

impl From<&FinanceError> for std::process::ExitCode {
    fn from(err: &FinanceError) -> Self {
        let code: u8 = match err {
            FinanceError::Io(_) | FinanceError::PasswordHash { .. } => 1,
            FinanceError::ConfigParse { .. }
            | FinanceError::ConfigMissing { .. }
            | FinanceError::ConfigInvalid { .. } => 2,
            FinanceError::Database { .. }
            | FinanceError::DatabaseQuery { .. }
            | FinanceError::UnknownUser { .. } => 3,
            FinanceError::MissingField { .. }
            | FinanceError::InvalidSymbol { .. }
            | FinanceError::NonPositiveQuantity => 4,
            FinanceError::InsufficientFunds { .. }
            | FinanceError::InsufficientShares { .. }
            | FinanceError::CashOverflow { .. } => 5,
            FinanceError::DuplicateUsername { .. }
            | FinanceError::PasswordMismatch
            | FinanceError::InvalidCredentials => 6,
        };
        std::process::ExitCode::from(code)
    }
}
