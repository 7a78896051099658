//! Holdings and portfolio valuation.

use rust_decimal::Decimal;

use crate::domain::order::Symbol;
use crate::ports::quote_port::QuotePort;

/// Net shares of one symbol, derived from the transaction history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holding {
    pub symbol: String,
    pub shares: i64,
}

/// One row of the portfolio page. `price` and `value` are `None` when the
/// oracle has no quote for the symbol or the position's value overflows.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioLine {
    pub symbol: String,
    pub name: String,
    pub shares: i64,
    pub price: Option<Decimal>,
    pub value: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub lines: Vec<PortfolioLine>,
    pub cash: Decimal,
}

impl Portfolio {
    pub fn value(cash: Decimal, holdings: &[Holding], quotes: &dyn QuotePort) -> Self {
        let lines = holdings
            .iter()
            .filter(|h| h.shares > 0)
            .map(|h| {
                let quote = Symbol::parse(&h.symbol)
                    .ok()
                    .and_then(|symbol| quotes.lookup(&symbol));
                match quote {
                    Some(q) => {
                        let value = q.price.checked_mul(Decimal::from(h.shares));
                        PortfolioLine {
                            symbol: h.symbol.clone(),
                            name: q.name,
                            shares: h.shares,
                            price: value.map(|_| q.price),
                            value,
                        }
                    }
                    None => PortfolioLine {
                        symbol: h.symbol.clone(),
                        name: h.symbol.clone(),
                        shares: h.shares,
                        price: None,
                        value: None,
                    },
                }
            })
            .collect();
        Portfolio { lines, cash }
    }

    /// Market value of every priced holding, or `None` if the sum overflows.
    pub fn holdings_value(&self) -> Option<Decimal> {
        self.lines
            .iter()
            .filter_map(|l| l.value)
            .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
    }

    /// Cash plus the value of every priced holding.
    pub fn grand_total(&self) -> Option<Decimal> {
        self.cash.checked_add(self.holdings_value()?)
    }
}
