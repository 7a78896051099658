//! Ledger entries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::order::Side;
use crate::domain::user::UserId;

/// One executed trade. Rows are append-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub user_id: UserId,
    pub symbol: String,
    /// Positive for a buy, negative for a sell.
    pub shares: i64,
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn side(&self) -> Side {
        if self.shares < 0 { Side::Sell } else { Side::Buy }
    }

    /// Cash moved by this trade, always non-negative.
    pub fn amount(&self) -> Decimal {
        self.price * Decimal::from(self.shares.unsigned_abs())
    }
}
