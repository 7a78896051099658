//! Price oracle backed by a configured quote table, with optional simulated
//! prices for symbols the table does not list.

use rand::{Rng, SeedableRng, rngs::StdRng};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;

use crate::domain::error::FinanceError;
use crate::domain::money::parse_amount;
use crate::domain::order::Symbol;
use crate::domain::quote::Quote;
use crate::ports::config_port::ConfigPort;
use crate::ports::quote_port::QuotePort;

/// Simulated prices fall in `[5.00, 500.00)`.
const MIN_SIMULATED_CENTS: i64 = 500;
const MAX_SIMULATED_CENTS: i64 = 50_000;
const MAX_SIMULATED_SYMBOL_LEN: usize = 5;

const RESERVED_KEYS: [&str; 2] = ["simulate", "seed"];

#[derive(Debug, Clone, Default)]
pub struct QuoteTableAdapter {
    table: HashMap<String, (String, Decimal)>,
    simulation_seed: Option<u64>,
}

impl QuoteTableAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the `[quotes]` section. Each entry other than `simulate` and
    /// `seed` is `SYMBOL = Display Name|price`.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, FinanceError> {
        let mut adapter = Self::new();

        for (key, value) in config.get_section("quotes") {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            let invalid = |reason: String| FinanceError::ConfigInvalid {
                section: "quotes".into(),
                key: key.clone(),
                reason,
            };
            let symbol = Symbol::parse(&key).map_err(|e| invalid(e.to_string()))?;
            let (name, price) = value
                .rsplit_once('|')
                .ok_or_else(|| invalid("expected `Name|price`".into()))?;
            let price = parse_amount(price)
                .filter(|p| !p.is_zero())
                .ok_or_else(|| invalid(format!("{price:?} is not a positive price")))?;
            adapter = adapter.with_quote(symbol.as_str(), name.trim(), price);
        }

        if config.get_bool("quotes", "simulate", false) {
            let seed = config.get_int("quotes", "seed", 0);
            adapter = adapter.with_simulation(seed as u64);
        }

        debug!(
            listed = adapter.table.len(),
            simulated = adapter.simulation_seed.is_some(),
            "quote table loaded"
        );
        Ok(adapter)
    }

    pub fn with_quote(mut self, symbol: &str, name: &str, price: Decimal) -> Self {
        self.table
            .insert(symbol.to_uppercase(), (name.to_string(), price));
        self
    }

    pub fn with_simulation(mut self, seed: u64) -> Self {
        self.simulation_seed = Some(seed);
        self
    }

    fn simulate(&self, symbol: &Symbol) -> Option<Quote> {
        let seed = self.simulation_seed?;
        let text = symbol.as_str();
        if text.is_empty()
            || text.len() > MAX_SIMULATED_SYMBOL_LEN
            || !text.chars().all(|c| c.is_ascii_uppercase())
        {
            return None;
        }

        let mut rng = StdRng::seed_from_u64(seed ^ fnv1a(text));
        let cents = rng.gen_range(MIN_SIMULATED_CENTS..MAX_SIMULATED_CENTS);
        Some(Quote {
            symbol: symbol.clone(),
            name: format!("{text} (simulated)"),
            price: Decimal::new(cents, 2),
        })
    }
}

impl QuotePort for QuoteTableAdapter {
    fn lookup(&self, symbol: &Symbol) -> Option<Quote> {
        match self.table.get(symbol.as_str()) {
            Some((name, price)) => Some(Quote {
                symbol: symbol.clone(),
                name: name.clone(),
                price: *price,
            }),
            None => self.simulate(symbol),
        }
    }
}

/// Stable across runs and platforms, unlike `DefaultHasher`.
fn fnv1a(text: &str) -> u64 {
    text.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}
