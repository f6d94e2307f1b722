//! Environment configuration for both the proxy process and the dashboard
//! client. Loaded once at startup, after `dotenvy` has populated the
//! environment.

use std::env;

use anyhow::Context;
use anyhow::Result;

/// Port the proxy binds when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 5000;

/// Proxy base URL the dashboard talks to when `CONCERTIO_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Clone, Debug)]
pub struct Config {
    /// Server-held credential injected into upstream requests. Its absence is
    /// not an error here; the proxy reports it per request.
    pub api_key: Option<String>,
    /// Optional public credential the dashboard forwards with its queries.
    pub public_api_key: Option<String>,
    /// Proxy listen port.
    pub port: u16,
    /// Proxy base URL, as seen by the dashboard client.
    pub api_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("PORT `{raw}` is not a valid port number"))?,
            Err(_) => DEFAULT_PORT,
        };
        Ok(Self {
            api_key: env::var("TICKETMASTER_API_KEY").ok(),
            public_api_key: env::var("CONCERTIO_PUBLIC_API_KEY").ok(),
            port,
            api_url: env::var("CONCERTIO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        })
    }
}
