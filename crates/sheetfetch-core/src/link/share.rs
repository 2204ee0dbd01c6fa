//! Share-link resolution: rewrite, decide, validate, plan.

use anyhow::anyhow;

use super::dropbox::rewrite_dropbox_url;
use super::error::LinkError;
use super::gdrive::rewrite_google_drive_url;
use super::proxy::{build_fetch_plan, needs_proxy, ProxyDecision, PUBLIC_PROXY_URL};
use super::{classify_provider, ProviderKind};
use crate::config::SheetfetchConfig;
use crate::resolver::{FetchPlan, Resolver};

/// Proxy endpoints a share link may be routed through.
#[derive(Debug, Clone)]
pub struct LinkResolver {
    public_proxy_base: String,
    private_proxy_base: Option<String>,
}

impl Default for LinkResolver {
    fn default() -> Self {
        Self::new(PUBLIC_PROXY_URL, None)
    }
}

/// Result of resolving one share link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    /// URL as supplied by the user.
    pub source_url: String,
    /// URL after Drive/Dropbox rewriting; this is what the proxy wraps.
    pub direct_url: String,
    pub provider: ProviderKind,
    pub gdrive_rewritten: bool,
    pub dropbox_rewritten: bool,
    pub decision: ProxyDecision,
    pub plan: FetchPlan,
}

impl LinkResolver {
    pub fn new(public_proxy_base: impl Into<String>, private_proxy_base: Option<String>) -> Self {
        Self {
            public_proxy_base: public_proxy_base.into(),
            private_proxy_base: private_proxy_base
                .map(|b| b.trim().to_string())
                .filter(|b| !b.is_empty()),
        }
    }

    pub fn from_config(cfg: &SheetfetchConfig) -> Self {
        Self::new(cfg.public_proxy_url.clone(), cfg.private_proxy_url.clone())
    }

    /// Replaces the private proxy base (e.g. from a command-line flag).
    pub fn with_private_proxy(mut self, base: Option<String>) -> Self {
        if let Some(b) = base.map(|b| b.trim().to_string()).filter(|b| !b.is_empty()) {
            self.private_proxy_base = Some(b);
        }
        self
    }

    /// Rewrites `url` to its direct-download form and plans how to fetch it.
    ///
    /// Fails only on configuration problems: a private flag on a non-GitHub
    /// URL, or private GitHub access without a proxy base.
    pub fn resolve(&self, url: &str, is_private: bool) -> Result<ResolvedLink, LinkError> {
        let source_url = url.trim().to_string();
        let (after_gdrive, gdrive_rewritten) = rewrite_google_drive_url(&source_url);
        let (direct_url, dropbox_rewritten) = rewrite_dropbox_url(&after_gdrive);
        let provider = classify_provider(&direct_url);

        if is_private && provider != ProviderKind::GitHub {
            return Err(LinkError::PrivateRequiresGithub(direct_url));
        }

        let decision = needs_proxy(&direct_url, is_private);
        let plan = build_fetch_plan(
            &self.public_proxy_base,
            decision,
            &direct_url,
            self.private_proxy_base.as_deref(),
        )?;

        tracing::debug!(
            provider = ?provider,
            decision = ?decision,
            gdrive_rewritten,
            dropbox_rewritten,
            "resolved share link"
        );

        Ok(ResolvedLink {
            source_url,
            direct_url,
            provider,
            gdrive_rewritten,
            dropbox_rewritten,
            decision,
            plan,
        })
    }
}

impl ResolvedLink {
    /// Final plan, with `Authorization: token {PAT}` attached for private GitHub access.
    pub fn authorized_plan(&self, github_pat: Option<&str>) -> anyhow::Result<FetchPlan> {
        if self.decision != ProxyDecision::PrivateProxy {
            return Ok(self.plan.clone());
        }
        let pat = github_pat
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| anyhow!("GITHUB_PAT is required for private GitHub access"))?;
        Ok(self
            .plan
            .clone()
            .with_header("Authorization", format!("token {pat}")))
    }
}

/// A share-link input: one URL plus the private flag and optional PAT.
#[derive(Debug, Clone)]
pub struct ShareLink<'a> {
    pub links: &'a LinkResolver,
    pub url: String,
    pub is_private: bool,
    pub github_pat: Option<String>,
}

impl Resolver for ShareLink<'_> {
    fn resolve(&self) -> anyhow::Result<FetchPlan> {
        let link = self.links.resolve(&self.url, self.is_private)?;
        link.authorized_plan(self.github_pat.as_deref())
    }
}
