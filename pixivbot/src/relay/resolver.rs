// ABOUTME: URL resolution strategies turning stored image references into fetchable URLs
// ABOUTME: Direct keeps the upstream URL; Proxied swaps its host for a configured mirror

use crate::error::RelayError;
use url::Url;

/// How a stored reference becomes a fetchable URL. Picked once from
/// configuration and shared by every request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    #[default]
    Direct,
    /// Replace the host (and port, for `host:port`) with a reverse proxy.
    Proxied { proxy_host: String },
}

impl DeliveryMode {
    pub fn proxied(proxy_host: impl Into<String>) -> Self {
        DeliveryMode::Proxied {
            proxy_host: proxy_host.into(),
        }
    }

    pub fn resolve(&self, source: &str) -> Result<String, RelayError> {
        match self {
            DeliveryMode::Direct => Ok(source.to_string()),
            DeliveryMode::Proxied { proxy_host } => replace_host(source, proxy_host),
        }
    }
}

fn replace_host(source: &str, proxy_host: &str) -> Result<String, RelayError> {
    let mut url = Url::parse(source).map_err(|e| RelayError::parse(source, e))?;
    let (host, port) = split_host_port(proxy_host);

    url.set_host(Some(host))
        .map_err(|e| RelayError::parse(source, format!("proxy host '{}': {}", proxy_host, e)))?;
    url.set_port(port)
        .map_err(|_| RelayError::parse(source, "URL cannot carry a port"))?;

    Ok(url.to_string())
}

/// Split `host:port`, leaving bracketed IPv6 literals and bare hosts alone.
fn split_host_port(proxy_host: &str) -> (&str, Option<u16>) {
    match proxy_host.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && (!host.contains(':') || host.ends_with(']')) => {
            match port.parse() {
                Ok(port) => (host, Some(port)),
                Err(_) => (proxy_host, None),
            }
        }
        _ => (proxy_host, None),
    }
}
