// loanlink-core/src/infrastructure/config/connection.rs

use serde::Serialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::fmt;
use std::str::FromStr;

use crate::infrastructure::error::InfrastructureError;

pub const DEFAULT_DATABASE_URL: &str = "postgresql://localhost:5432/loanlink";
pub const DEFAULT_PROVIDER_MARKER: &str = "neon.tech";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsPolicy {
    Disabled,
    /// Encrypt the transport but accept any server certificate.
    RequireUnverified,
}

impl fmt::Display for TlsPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TlsPolicy::Disabled => f.write_str("off"),
            TlsPolicy::RequireUnverified => f.write_str("required, certificate not verified"),
        }
    }
}

impl TlsPolicy {
    pub fn ssl_mode(&self) -> PgSslMode {
        match self {
            TlsPolicy::Disabled => PgSslMode::Disable,
            // sqlx `Require` encrypts without verifying the CA or host name.
            TlsPolicy::RequireUnverified => PgSslMode::Require,
        }
    }
}

/// Resolved connection string and transport policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub url: String,
    pub tls: TlsPolicy,
}

impl ConnectionSettings {
    /// Falls back to the local default when no URL is supplied. TLS is turned
    /// on only when the URL names the managed-hosting provider.
    pub fn resolve(url: Option<&str>, provider_marker: &str) -> Self {
        let url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_DATABASE_URL)
            .to_string();

        let tls = if !provider_marker.is_empty() && url.contains(provider_marker) {
            TlsPolicy::RequireUnverified
        } else {
            TlsPolicy::Disabled
        };

        Self { url, tls }
    }

    pub fn connect_options(&self) -> Result<PgConnectOptions, InfrastructureError> {
        let options = PgConnectOptions::from_str(&self.url)?;
        Ok(options.ssl_mode(self.tls.ssl_mode()))
    }

    /// The URL with its password masked, safe to print.
    pub fn redacted_url(&self) -> String {
        let Some((scheme, rest)) = self.url.split_once("://") else {
            return self.url.clone();
        };
        let Some((userinfo, host)) = rest.rsplit_once('@') else {
            return self.url.clone();
        };
        match userinfo.split_once(':') {
            Some((user, _password)) => format!("{scheme}://{user}:****@{host}"),
            None => self.url.clone(),
        }
    }
}
