//! Concrete adapter implementations for ports.

pub mod file_config_adapter;
pub mod quote_table;
pub mod sqlite_adapter;
pub mod web;
