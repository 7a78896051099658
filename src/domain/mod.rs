//! Core domain types and trading logic.

pub mod accounting;
pub mod broker;
pub mod error;
pub mod money;
pub mod order;
pub mod portfolio;
pub mod quote;
pub mod transaction;
pub mod user;
