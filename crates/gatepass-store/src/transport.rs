// Shared transport configuration for building reqwest::Client instances.
//
// The record store is a hosted HTTPS service authenticated with a service
// key sent on every request, so the client is built once with the key in
// its default headers.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` carrying the store service key.
    ///
    /// The key is sent both as `apikey` and as a bearer token, which is
    /// what the hosted store expects for row-level-access enforcement.
    pub fn build_client(&self, api_key: &SecretString) -> Result<reqwest::Client, Error> {
        let mut headers = HeaderMap::new();

        let key = HeaderValue::from_str(api_key.expose_secret()).map_err(|_| Error::Api {
            message: "service key contains non-header characters".into(),
            code: None,
            status: 0,
        })?;
        let mut bearer =
            HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret())).map_err(
                |_| Error::Api {
                    message: "service key contains non-header characters".into(),
                    code: None,
                    status: 0,
                },
            )?;
        bearer.set_sensitive(true);

        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("gatepass/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(Error::Transport)
    }
}
