// src/config.rs
use anyhow::{Context, Result};
use log::{info, warn};
use std::env;
use std::net::{IpAddr, SocketAddr};

pub const DEFAULT_PORT: u16 = 3030;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: IpAddr,
    pub port: u16,
}

impl Config {
    /// Reads `PORT` and `BIND_ADDR`. Call `dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self> {
        let port_str = env::var("PORT").unwrap_or_else(|_| {
            warn!("$PORT not set, defaulting to {}", DEFAULT_PORT);
            DEFAULT_PORT.to_string()
        });
        let bind_str = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        Self::parse(&bind_str, &port_str)
    }

    fn parse(bind_str: &str, port_str: &str) -> Result<Self> {
        let port: u16 = port_str
            .trim()
            .parse()
            .with_context(|| format!("PORT must be a number, got {:?}", port_str))?;
        let bind_addr: IpAddr = bind_str
            .trim()
            .parse()
            .with_context(|| format!("BIND_ADDR must be an IP address, got {:?}", bind_str))?;

        info!("Using {}:{}", bind_addr, port);
        Ok(Config { bind_addr, port })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_address_and_port() {
        let config = Config::parse("127.0.0.1", "8080").unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn rejects_non_numeric_port() {
        assert!(Config::parse("0.0.0.0", "http").is_err());
        assert!(Config::parse("localhost", "3030").is_err());
    }
}
