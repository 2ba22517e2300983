use std::env;
use std::net::SocketAddr;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";

pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Self {
        let bind_addr = env::var("BIND_ADDR")
            .ok()
            .and_then(|addr| addr.parse().ok())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.parse().expect("default bind addr is valid"));

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/eventide".to_string()),
            bind_addr,
        }
    }
}
