#![allow(dead_code)]

use finance::adapters::quote_table::QuoteTableAdapter;
use finance::adapters::sqlite_adapter::SqliteAdapter;
use finance::domain::order::Symbol;
use finance::domain::quote::Quote;
use finance::ports::config_port::ConfigPort;
use finance::ports::ledger_port::LedgerPort;
use finance::ports::quote_port::QuotePort;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::io::Write;

/// 64 bytes, hex encoded.
pub fn session_secret() -> String {
    "0123456789abcdef".repeat(8)
}

/// Fixed prices keyed by upper-case symbol.
pub struct MockQuotePort {
    pub prices: HashMap<String, (String, Decimal)>,
}

impl MockQuotePort {
    pub fn new() -> Self {
        Self {
            prices: HashMap::new(),
        }
    }

    pub fn with_price(mut self, symbol: &str, name: &str, price: Decimal) -> Self {
        self.prices
            .insert(symbol.to_string(), (name.to_string(), price));
        self
    }

    pub fn set_price(&mut self, symbol: &str, price: Decimal) {
        if let Some(entry) = self.prices.get_mut(symbol) {
            entry.1 = price;
        }
    }
}

impl QuotePort for MockQuotePort {
    fn lookup(&self, symbol: &Symbol) -> Option<Quote> {
        self.prices.get(symbol.as_str()).map(|(name, price)| Quote {
            symbol: symbol.clone(),
            name: name.clone(),
            price: *price,
        })
    }
}

/// Config for a router backed by in-memory stores.
pub struct MockConfigPort;

impl ConfigPort for MockConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        match (section, key) {
            ("auth", "session_secret") => Some(session_secret()),
            ("database", "sqlite_path") => Some(":memory:".to_string()),
            _ => None,
        }
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        match (section, key) {
            ("auth", "session_lifetime") => 3600,
            _ => default,
        }
    }

    fn get_bool(&self, _section: &str, _key: &str, default: bool) -> bool {
        default
    }
}

pub fn ledger() -> SqliteAdapter {
    let ledger = SqliteAdapter::in_memory().unwrap();
    ledger.initialize_schema().unwrap();
    ledger
}

pub fn quotes() -> MockQuotePort {
    MockQuotePort::new()
        .with_price("AAPL", "Apple Inc.", Decimal::new(100, 0))
        .with_price("NFLX", "Netflix, Inc.", Decimal::new(25050, 2))
}

pub fn quote_table() -> QuoteTableAdapter {
    QuoteTableAdapter::new()
        .with_quote("AAPL", "Apple Inc.", Decimal::new(100, 0))
        .with_quote("NFLX", "Netflix, Inc.", Decimal::new(25050, 2))
}

/// A registered user with a throwaway password hash.
pub fn user(ledger: &dyn LedgerPort, username: &str) -> i64 {
    ledger.create_user(username, "not-a-real-hash").unwrap().id
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub mod web {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, Response, header},
    };
    use finance::adapters::web::{AppState, build_router};
    use http_body_util::BodyExt;
    use std::sync::Arc;

    pub struct TestApp {
        pub router: Router,
        pub ledger: Arc<SqliteAdapter>,
    }

    pub fn app() -> TestApp {
        let ledger = Arc::new(ledger());
        let state = AppState {
            ledger: ledger.clone(),
            quotes: Arc::new(quotes()),
            config: Arc::new(MockConfigPort),
        };
        TestApp {
            router: build_router(state).unwrap(),
            ledger,
        }
    }

    pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    pub fn post_form(uri: &str, form: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(form.to_string())).unwrap()
    }

    /// Cookie header replaying every `Set-Cookie` of `response`.
    pub fn cookie_header(response: &Response<Body>) -> String {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(|sc| sc.split(';').next().unwrap_or("").to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn location(response: &Response<Body>) -> String {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    pub async fn body_text(response: Response<Body>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}
