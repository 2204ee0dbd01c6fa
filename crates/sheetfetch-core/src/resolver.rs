//! Resolver interface for turning user inputs into a concrete fetch request.
//!
//! The fetch layer only depends on this trait and does not know about share
//! links, token access, or any provider-specific rewriting.

use std::collections::HashMap;

/// HTTP method of a planned request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    /// Used by the Dropbox content API, which takes its argument in a header.
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Minimal request specification needed to download a resource.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchPlan {
    pub url: String,
    /// Extra headers; empty unless a private proxy or bearer token is used.
    pub headers: HashMap<String, String>,
    pub method: Method,
}

impl FetchPlan {
    /// Plain GET of `url` with no extra headers.
    pub fn direct(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            method: Method::Get,
        }
    }

    /// Adds (or replaces) a header, e.g. `Authorization` after proxy routing.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }
}

/// Implemented by every input mode (share link, token access).
pub trait Resolver {
    fn resolve(&self) -> anyhow::Result<FetchPlan>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_plan_has_no_headers() {
        let plan = FetchPlan::direct("https://example.com/data.csv");
        assert_eq!(plan.url, "https://example.com/data.csv");
        assert!(plan.headers.is_empty());
        assert_eq!(plan.method, Method::Get);
    }

    #[test]
    fn with_header_adds_and_replaces() {
        let plan = FetchPlan::direct("https://proxy.example.com/?url=x")
            .with_header("Authorization", "token abc")
            .with_header("Authorization", "token xyz");
        assert_eq!(plan.headers.len(), 1);
        assert_eq!(plan.headers.get("Authorization").unwrap(), "token xyz");
    }

    #[test]
    fn with_method_post() {
        let plan = FetchPlan::direct("https://content.dropboxapi.com/2/files/download")
            .with_method(Method::Post);
        assert_eq!(plan.method.as_str(), "POST");
    }
}
