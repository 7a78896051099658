//! Accounting engine: validates a priced order against one account snapshot.
//!
//! The engine is pure. The ledger reads the snapshot, calls [`settle`], and
//! writes the resulting [`Settlement`] in the same database transaction, so
//! either both the cash update and the transaction row land or neither does.

use rust_decimal::Decimal;

use crate::domain::error::FinanceError;
use crate::domain::order::{PricedOrder, Side};

/// A user's cash and current holding of the order's symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Account {
    pub cash: Decimal,
    pub held: i64,
}

/// The state changes an accepted order produces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settlement {
    pub cash_after: Decimal,
    /// Positive for a buy, negative for a sell.
    pub signed_shares: i64,
    /// Quantity times price, always non-negative.
    pub amount: Decimal,
}

pub fn settle(account: &Account, order: &PricedOrder) -> Result<Settlement, FinanceError> {
    match order.side {
        Side::Buy => buy(account, order),
        Side::Sell => sell(account, order),
    }
}

pub fn buy(account: &Account, order: &PricedOrder) -> Result<Settlement, FinanceError> {
    let quantity = order.quantity.get();
    let cost = order
        .price
        .checked_mul(Decimal::from(quantity))
        .ok_or(FinanceError::InsufficientFunds {
            cost: Decimal::MAX,
            cash: account.cash,
        })?;

    if cost > account.cash {
        return Err(FinanceError::InsufficientFunds {
            cost,
            cash: account.cash,
        });
    }

    Ok(Settlement {
        cash_after: account.cash - cost,
        signed_shares: quantity,
        amount: cost,
    })
}

pub fn sell(account: &Account, order: &PricedOrder) -> Result<Settlement, FinanceError> {
    let quantity = order.quantity.get();
    if account.held <= 0 {
        return Err(FinanceError::InvalidSymbol {
            symbol: order.symbol.to_string(),
        });
    }
    if quantity > account.held {
        return Err(FinanceError::InsufficientShares {
            symbol: order.symbol.to_string(),
            requested: quantity,
            held: account.held,
        });
    }

    let overflow = || FinanceError::CashOverflow {
        symbol: order.symbol.to_string(),
    };
    let proceeds = order
        .price
        .checked_mul(Decimal::from(quantity))
        .ok_or_else(overflow)?;
    let cash_after = account.cash.checked_add(proceeds).ok_or_else(overflow)?;
    Ok(Settlement {
        cash_after,
        signed_shares: -quantity,
        amount: proceeds,
    })
}
