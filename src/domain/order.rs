//! Typed order input.
//!
//! Raw form strings are parsed here once; everything past this module works
//! with [`Symbol`] and [`Quantity`] and never re-validates.

use rust_decimal::Decimal;
use std::fmt;

use crate::domain::error::FinanceError;
use crate::domain::quote::Quote;

const MAX_SYMBOL_LEN: usize = 12;

/// An upper-case ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(raw: &str) -> Result<Self, FinanceError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FinanceError::MissingField { field: "symbol" });
        }
        let symbol = trimmed.to_uppercase();
        let well_formed = symbol.len() <= MAX_SYMBOL_LEN
            && symbol
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
        if !well_formed {
            return Err(FinanceError::InvalidSymbol { symbol });
        }
        Ok(Symbol(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A strictly positive whole number of shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quantity(i64);

impl Quantity {
    pub fn parse(raw: &str) -> Result<Self, FinanceError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FinanceError::MissingField { field: "shares" });
        }
        if !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(FinanceError::NonPositiveQuantity);
        }
        let value: i64 = trimmed
            .parse()
            .map_err(|_| FinanceError::NonPositiveQuantity)?;
        Self::new(value)
    }

    pub fn new(value: i64) -> Result<Self, FinanceError> {
        if value <= 0 {
            return Err(FinanceError::NonPositiveQuantity);
        }
        Ok(Quantity(value))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("buy"),
            Side::Sell => f.write_str("sell"),
        }
    }
}

/// A validated but not yet priced order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub symbol: Symbol,
    pub quantity: Quantity,
}

impl OrderRequest {
    /// Parse raw form values. `None` and blank strings count as missing.
    pub fn parse(symbol: Option<&str>, shares: Option<&str>) -> Result<Self, FinanceError> {
        let symbol = Symbol::parse(symbol.unwrap_or(""))?;
        let quantity = Quantity::parse(shares.unwrap_or(""))?;
        Ok(OrderRequest { symbol, quantity })
    }

    pub fn priced(self, side: Side, quote: &Quote) -> PricedOrder {
        PricedOrder {
            side,
            symbol: self.symbol,
            quantity: self.quantity,
            price: quote.price,
        }
    }
}

/// An order with the execution price resolved by the oracle.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedOrder {
    pub side: Side,
    pub symbol: Symbol,
    pub quantity: Quantity,
    pub price: Decimal,
}
