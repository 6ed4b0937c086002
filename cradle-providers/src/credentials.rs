//! Credential lookup for hosted providers.
//!
//! Credentials come only from environment variables, never from provider
//! config files. Lookups go through [`EnvSource`] so tests can supply a map
//! instead of mutating the process environment.

use std::collections::HashMap;
use std::env;

use secrecy::{ExposeSecret, SecretString};

use crate::registry::ProviderDescriptor;

/// A credential read from an environment variable.
///
/// `Debug` shows the variable name and never the value.
#[derive(Clone)]
pub struct ApiKey {
    var: &'static str,
    secret: SecretString,
}

impl ApiKey {
    pub fn from_env(var: &'static str, value: impl Into<String>) -> Self {
        Self {
            var,
            secret: SecretString::from(value.into()),
        }
    }

    /// Environment variable the key was read from.
    pub fn var(&self) -> &'static str {
        self.var
    }

    /// The raw value, for request headers only.
    pub fn expose_secret(&self) -> &str {
        self.secret.expose_secret()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey({}=[REDACTED])", self.var)
    }
}

/// Source of environment variables.
pub trait EnvSource: Send + Sync {
    /// Value of `name`, or `None` when unset or empty.
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        env::var(name).ok().filter(|v| !v.is_empty())
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).filter(|v| !v.is_empty()).cloned()
    }
}

/// First credential variable of `descriptor` that is not set.
pub fn missing_credential(
    env: &dyn EnvSource,
    descriptor: &ProviderDescriptor,
) -> Option<&'static str> {
    descriptor
        .credential_env
        .iter()
        .copied()
        .find(|name| env.var(name).is_none())
}

/// Credentials for `descriptor`, as `(primary, secondary)`.
///
/// Either key is `None` when its variable is unset.
pub fn credentials_for(
    env: &dyn EnvSource,
    descriptor: &ProviderDescriptor,
) -> (Option<ApiKey>, Option<ApiKey>) {
    let mut vars = descriptor.credential_env.iter();
    let mut read = || {
        let var = *vars.next()?;
        env.var(var).map(|value| ApiKey::from_env(var, value))
    };
    let primary = read();
    let secondary = read();
    (primary, secondary)
}
