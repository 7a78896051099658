//! HTML templates using Askama.
//!
//! Money and timestamps are formatted before they reach a template, so the
//! templates only lay out strings.

use askama::Template;

use crate::domain::money::usd;
use crate::domain::portfolio::{Portfolio, PortfolioLine};
use crate::domain::quote::Quote;
use crate::domain::transaction::Transaction;

const NOT_AVAILABLE: &str = "N/A";

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub logged_in: bool,
    pub username: String,
    pub rows: Vec<PortfolioRow>,
    pub cash: String,
    pub total: String,
}

pub struct PortfolioRow {
    pub symbol: String,
    pub name: String,
    pub shares: i64,
    pub price: String,
    pub value: String,
}

impl From<&PortfolioLine> for PortfolioRow {
    fn from(line: &PortfolioLine) -> Self {
        Self {
            symbol: line.symbol.clone(),
            name: line.name.clone(),
            shares: line.shares,
            price: line.price.as_ref().map_or_else(|| NOT_AVAILABLE.to_string(), usd),
            value: line.value.as_ref().map_or_else(|| NOT_AVAILABLE.to_string(), usd),
        }
    }
}

impl IndexTemplate {
    pub fn new(username: &str, portfolio: &Portfolio) -> Self {
        Self {
            logged_in: true,
            username: username.to_string(),
            rows: portfolio.lines.iter().map(PortfolioRow::from).collect(),
            cash: usd(&portfolio.cash),
            total: portfolio
                .grand_total()
                .as_ref()
                .map_or_else(|| NOT_AVAILABLE.to_string(), usd),
        }
    }
}

#[derive(Template)]
#[template(path = "quote.html")]
pub struct QuoteFormTemplate {
    pub logged_in: bool,
}

#[derive(Template)]
#[template(path = "quoted.html")]
pub struct QuotedTemplate {
    pub logged_in: bool,
    pub name: String,
    pub symbol: String,
    pub price: String,
}

impl QuotedTemplate {
    pub fn new(quote: &Quote) -> Self {
        Self {
            logged_in: true,
            name: quote.name.clone(),
            symbol: quote.symbol.to_string(),
            price: usd(&quote.price),
        }
    }
}

#[derive(Template)]
#[template(path = "buy.html")]
pub struct BuyTemplate {
    pub logged_in: bool,
}

#[derive(Template)]
#[template(path = "sell.html")]
pub struct SellTemplate {
    pub logged_in: bool,
    pub symbols: Vec<String>,
}

#[derive(Template)]
#[template(path = "history.html")]
pub struct HistoryTemplate {
    pub logged_in: bool,
    pub rows: Vec<HistoryRow>,
}

pub struct HistoryRow {
    pub side: String,
    pub symbol: String,
    pub shares: i64,
    pub price: String,
    pub total: String,
    pub transacted: String,
}

impl From<&Transaction> for HistoryRow {
    fn from(tx: &Transaction) -> Self {
        Self {
            side: tx.side().to_string(),
            symbol: tx.symbol.clone(),
            shares: tx.shares,
            price: usd(&tx.price),
            total: usd(&tx.amount()),
            transacted: tx.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

impl HistoryTemplate {
    pub fn new(transactions: &[Transaction]) -> Self {
        Self {
            logged_in: true,
            rows: transactions.iter().map(HistoryRow::from).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub logged_in: bool,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub logged_in: bool,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub logged_in: bool,
    pub message: &'a str,
    pub status: u16,
}
