//! Persistent ledger port trait.

use crate::domain::error::FinanceError;
use crate::domain::order::PricedOrder;
use crate::domain::portfolio::Holding;
use crate::domain::transaction::Transaction;
use crate::domain::user::{User, UserId};

pub trait LedgerPort {
    /// Insert a user with the ledger's starting cash. Fails with
    /// `DuplicateUsername` if the name is taken.
    fn create_user(&self, username: &str, password_hash: &str) -> Result<User, FinanceError>;

    fn find_user(&self, username: &str) -> Result<Option<User>, FinanceError>;

    fn get_user(&self, id: UserId) -> Result<Option<User>, FinanceError>;

    /// Symbols with a positive net share count, ordered by symbol.
    fn holdings(&self, user_id: UserId) -> Result<Vec<Holding>, FinanceError>;

    /// All transactions of a user, newest first.
    fn history(&self, user_id: UserId) -> Result<Vec<Transaction>, FinanceError>;

    /// Validate `order` against the user's cash and holding and, if accepted,
    /// update cash and append the transaction atomically.
    fn settle(&self, user_id: UserId, order: &PricedOrder) -> Result<Transaction, FinanceError>;
}
