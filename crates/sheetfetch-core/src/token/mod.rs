//! Token access: provider APIs addressed by path or id, authorized with a
//! bearer token or GitHub PAT.
//!
//! Tokens are held in a [`TokenCache`] owned by the caller's session rather
//! than in process-wide state, so tests and separate sessions never share one.

mod access;

pub use access::{TokenAccess, TokenAccessError, TokenProvider, TokenRequest};

use anyhow::Result;
use std::fmt;
use std::sync::Mutex;

/// An access token or PAT. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken(<{} chars>)", self.0.len())
    }
}

/// Where tokens come from.
pub trait TokenSource {
    /// Short label for log lines (never the token itself).
    fn label(&self) -> &str;
    fn fetch(&self) -> Result<AccessToken>;
}

/// Reads an already-issued token from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvTokenSource {
    var: String,
}

impl EnvTokenSource {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn for_provider(provider: TokenProvider) -> Self {
        Self::new(provider.env_var())
    }
}

impl TokenSource for EnvTokenSource {
    fn label(&self) -> &str {
        &self.var
    }

    fn fetch(&self) -> Result<AccessToken> {
        match std::env::var(&self.var) {
            Ok(v) if !v.trim().is_empty() => Ok(AccessToken::new(v.trim())),
            _ => Err(TokenAccessError::MissingCredential(self.var.clone()).into()),
        }
    }
}

/// Caches the token from `source` until [`invalidate`](Self::invalidate) is called.
#[derive(Debug)]
pub struct TokenCache<S> {
    source: S,
    cached: Mutex<Option<AccessToken>>,
}

impl<S: TokenSource> TokenCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cached: Mutex::new(None),
        }
    }

    /// Returns the cached token, fetching it from the source on first use.
    pub fn get_or_refresh(&self) -> Result<AccessToken> {
        let mut cached = self
            .cached
            .lock()
            .map_err(|_| anyhow::anyhow!("token cache lock poisoned"))?;
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }
        let token = self.source.fetch()?;
        tracing::debug!(source = self.source.label(), "token fetched");
        *cached = Some(token.clone());
        Ok(token)
    }

    /// Drops the cached token (e.g. after a 401) so the next call refetches.
    pub fn invalidate(&self) {
        if let Ok(mut cached) = self.cached.lock() {
            *cached = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: AtomicUsize,
    }

    impl TokenSource for Counting {
        fn label(&self) -> &str {
            "counting"
        }

        fn fetch(&self) -> Result<AccessToken> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AccessToken::new(format!("tok-{n}")))
        }
    }

    #[test]
    fn cache_fetches_once_until_invalidated() {
        let cache = TokenCache::new(Counting {
            calls: AtomicUsize::new(0),
        });
        assert_eq!(cache.get_or_refresh().unwrap().secret(), "tok-0");
        assert_eq!(cache.get_or_refresh().unwrap().secret(), "tok-0");
        cache.invalidate();
        assert_eq!(cache.get_or_refresh().unwrap().secret(), "tok-1");
    }

    #[test]
    fn debug_hides_secret() {
        let t = AccessToken::new("ghp_verysecret");
        assert!(!format!("{t:?}").contains("verysecret"));
    }

    #[test]
    fn env_source_missing_var() {
        let src = EnvTokenSource::new("SHEETFETCH_TEST_TOKEN_THAT_IS_NOT_SET");
        let err = src.fetch().unwrap_err();
        assert!(err.to_string().contains("SHEETFETCH_TEST_TOKEN_THAT_IS_NOT_SET"));
    }
}
