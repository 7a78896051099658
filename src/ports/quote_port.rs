//! Price oracle port trait.

use crate::domain::order::Symbol;
use crate::domain::quote::Quote;

pub trait QuotePort {
    /// Current price and display name, or `None` if the symbol is unknown or
    /// the oracle cannot answer.
    fn lookup(&self, symbol: &Symbol) -> Option<Quote>;
}
