//! Oracle quote value.

use rust_decimal::Decimal;

use crate::domain::order::Symbol;

#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub symbol: Symbol,
    pub name: String,
    pub price: Decimal,
}
