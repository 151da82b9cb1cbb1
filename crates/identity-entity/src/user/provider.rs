//! Identity provider enumeration.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Where a principal's credentials are checked.
///
/// Only `Local` principals have their password verified by this service;
/// any other provider name is trusted to have authenticated upstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum AuthProvider {
    /// Password stored in the credential store.
    Local,
    /// Named external identity provider.
    External(String),
}

impl AuthProvider {
    /// Return the provider as a lowercase string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Local => "local",
            Self::External(name) => name.as_str(),
        }
    }

    /// Whether the password must be verified locally.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local)
    }
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AuthProvider {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if normalized.is_empty() || normalized == "local" {
            Ok(Self::Local)
        } else {
            Ok(Self::External(normalized))
        }
    }
}

impl From<String> for AuthProvider {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(provider) => provider,
            Err(never) => match never {},
        }
    }
}

impl From<AuthProvider> for String {
    fn from(value: AuthProvider) -> Self {
        value.as_str().to_string()
    }
}
