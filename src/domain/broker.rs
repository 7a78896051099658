//! Trading operations over an explicit ledger and price oracle.
//!
//! A [`Broker`] is built per request from whatever ledger and oracle the
//! caller owns; nothing here reaches for global state.

use tracing::{info, warn};

use crate::domain::error::FinanceError;
use crate::domain::order::{OrderRequest, Side, Symbol};
use crate::domain::portfolio::{Holding, Portfolio};
use crate::domain::quote::Quote;
use crate::domain::transaction::Transaction;
use crate::domain::user::UserId;
use crate::ports::ledger_port::LedgerPort;
use crate::ports::quote_port::QuotePort;

pub struct Broker<'a> {
    ledger: &'a dyn LedgerPort,
    quotes: &'a dyn QuotePort,
}

impl<'a> Broker<'a> {
    pub fn new(ledger: &'a dyn LedgerPort, quotes: &'a dyn QuotePort) -> Self {
        Self { ledger, quotes }
    }

    /// Resolve a raw symbol through the oracle.
    pub fn quote(&self, raw_symbol: Option<&str>) -> Result<Quote, FinanceError> {
        let symbol = Symbol::parse(raw_symbol.unwrap_or(""))?;
        self.lookup(&symbol)
    }

    pub fn buy(
        &self,
        user_id: UserId,
        symbol: Option<&str>,
        shares: Option<&str>,
    ) -> Result<Transaction, FinanceError> {
        self.trade(user_id, Side::Buy, symbol, shares)
    }

    pub fn sell(
        &self,
        user_id: UserId,
        symbol: Option<&str>,
        shares: Option<&str>,
    ) -> Result<Transaction, FinanceError> {
        self.trade(user_id, Side::Sell, symbol, shares)
    }

    pub fn portfolio(&self, user_id: UserId) -> Result<Portfolio, FinanceError> {
        let user = self
            .ledger
            .get_user(user_id)?
            .ok_or(FinanceError::UnknownUser { id: user_id })?;
        let holdings = self.ledger.holdings(user_id)?;
        Ok(Portfolio::value(user.cash, &holdings, self.quotes))
    }

    pub fn holdings(&self, user_id: UserId) -> Result<Vec<Holding>, FinanceError> {
        self.ledger.holdings(user_id)
    }

    pub fn history(&self, user_id: UserId) -> Result<Vec<Transaction>, FinanceError> {
        self.ledger.history(user_id)
    }

    fn trade(
        &self,
        user_id: UserId,
        side: Side,
        symbol: Option<&str>,
        shares: Option<&str>,
    ) -> Result<Transaction, FinanceError> {
        let request = OrderRequest::parse(symbol, shares)?;
        let quote = self.lookup(&request.symbol)?;
        let order = request.priced(side, &quote);

        match self.ledger.settle(user_id, &order) {
            Ok(tx) => {
                info!(
                    user_id,
                    %side,
                    symbol = %order.symbol,
                    shares = order.quantity.get(),
                    price = %order.price,
                    "trade settled"
                );
                Ok(tx)
            }
            Err(e) => {
                if e.is_rejection() {
                    warn!(user_id, %side, symbol = %order.symbol, "trade rejected: {e}");
                }
                Err(e)
            }
        }
    }

    fn lookup(&self, symbol: &Symbol) -> Result<Quote, FinanceError> {
        self.quotes
            .lookup(symbol)
            .ok_or_else(|| FinanceError::InvalidSymbol {
                symbol: symbol.to_string(),
            })
    }
}
