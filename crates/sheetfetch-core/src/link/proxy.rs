//! Proxy decision table and proxy URL construction.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::error::LinkError;
use super::{classify_provider, ProviderKind};
use crate::resolver::FetchPlan;

/// Public CORS proxy used for hosts that do not serve permissive CORS headers.
pub const PUBLIC_PROXY_URL: &str = "https://github-proxy-auth.tigzig.com";

/// RFC 3986 unreserved characters stay literal; everything else, `/` included, is escaped.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// How a URL has to be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyDecision {
    None,
    PublicProxy,
    PrivateProxy,
}

/// True for GitHub release asset URLs.
pub fn is_github_release_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    if !lower.contains("github.com") {
        return false;
    }
    let path = url::Url::parse(&lower)
        .map(|u| u.path().to_string())
        .unwrap_or(lower);
    path.contains("/releases/")
}

/// Decides whether `url` must go through a proxy. First matching rule wins.
pub fn needs_proxy(url: &str, is_private: bool) -> ProxyDecision {
    let provider = classify_provider(url);
    if is_private {
        return if provider == ProviderKind::GitHub {
            ProxyDecision::PrivateProxy
        } else {
            ProxyDecision::None
        };
    }
    if is_github_release_url(url) {
        return ProxyDecision::PublicProxy;
    }
    match provider {
        ProviderKind::GoogleDrive | ProviderKind::Dropbox => ProxyDecision::PublicProxy,
        ProviderKind::GitHub | ProviderKind::Other => ProxyDecision::None,
    }
}

/// Percent-encodes `s` for use as a single query value.
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

/// Builds the fetch plan for `decision` using the fixed public proxy host.
///
/// `PrivateProxy` requires `private_proxy_base`; the `Authorization` header
/// is left for the caller to add.
pub fn build_proxy_url(
    decision: ProxyDecision,
    url: &str,
    private_proxy_base: Option<&str>,
) -> Result<FetchPlan, LinkError> {
    build_fetch_plan(PUBLIC_PROXY_URL, decision, url, private_proxy_base)
}

pub(super) fn build_fetch_plan(
    public_proxy_base: &str,
    decision: ProxyDecision,
    url: &str,
    private_proxy_base: Option<&str>,
) -> Result<FetchPlan, LinkError> {
    match decision {
        ProxyDecision::None => Ok(FetchPlan::direct(url)),
        ProxyDecision::PublicProxy => Ok(FetchPlan::direct(wrap(public_proxy_base, url))),
        ProxyDecision::PrivateProxy => {
            let base = private_proxy_base
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .ok_or(LinkError::MissingProxyBase)?;
            Ok(FetchPlan::direct(wrap(base, url)))
        }
    }
}

fn wrap(base: &str, url: &str) -> String {
    format!("{}/?url={}", base.trim_end_matches('/'), encode_component(url))
}
