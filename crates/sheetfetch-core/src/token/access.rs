//! Per-provider input validation and request plans.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::{AccessToken, TokenCache, TokenSource};
use crate::link::{build_proxy_url, extract_gdrive_file_id, is_github_release_url, ProxyDecision};
use crate::resolver::{FetchPlan, Method, Resolver};

const DROPBOX_DOWNLOAD_URL: &str = "https://content.dropboxapi.com/2/files/download";
const GDRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenAccessError {
    #[error("unknown provider '{0}' (expected Dropbox, Google Drive or GitHub)")]
    UnknownProvider(String),
    #[error("Dropbox paths must start with / (e.g. /folder/file.ext)")]
    DropboxPathNotAbsolute,
    #[error("invalid Google Drive input '{0}': provide a file id or URL")]
    InvalidDriveInput(String),
    #[error("GitHub requires a full URL (e.g. https://github.com/...)")]
    GithubNeedsUrl,
    #[error("auth proxy required for private GitHub release assets")]
    AuthProxyRequired,
    #[error("{0} is not set")]
    MissingCredential(String),
}

/// Storage provider for token access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenProvider {
    Dropbox,
    GoogleDrive,
    GitHub,
}

impl TokenProvider {
    /// Environment variable holding this provider's token.
    pub fn env_var(self) -> &'static str {
        match self {
            TokenProvider::Dropbox => "DROPBOX_ACCESS_TOKEN",
            TokenProvider::GoogleDrive => "GDRIVE_ACCESS_TOKEN",
            TokenProvider::GitHub => "GITHUB_PAT",
        }
    }
}

impl fmt::Display for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenProvider::Dropbox => "Dropbox",
            TokenProvider::GoogleDrive => "Google Drive",
            TokenProvider::GitHub => "GitHub",
        })
    }
}

impl FromStr for TokenProvider {
    type Err = TokenAccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match norm.as_str() {
            "dropbox" => Ok(TokenProvider::Dropbox),
            "googledrive" | "gdrive" => Ok(TokenProvider::GoogleDrive),
            "github" => Ok(TokenProvider::GitHub),
            _ => Err(TokenAccessError::UnknownProvider(s.trim().to_string())),
        }
    }
}

/// A validated token-access target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAccess {
    pub provider: TokenProvider,
    /// Dropbox path, Drive file id (extracted from a URL if needed) or GitHub URL.
    pub target: String,
    /// Private proxy base, GitHub only.
    pub proxy_base: Option<String>,
}

impl TokenAccess {
    pub fn new(
        provider: TokenProvider,
        input: &str,
        proxy_base: Option<String>,
    ) -> Result<Self, TokenAccessError> {
        let input = input.trim();
        let target = match provider {
            TokenProvider::Dropbox => {
                if !input.starts_with('/') {
                    return Err(TokenAccessError::DropboxPathNotAbsolute);
                }
                input.to_string()
            }
            TokenProvider::GoogleDrive => extract_gdrive_file_id(input)
                .ok_or_else(|| TokenAccessError::InvalidDriveInput(input.to_string()))?,
            TokenProvider::GitHub => {
                if !input.to_ascii_lowercase().starts_with("http") {
                    return Err(TokenAccessError::GithubNeedsUrl);
                }
                input.to_string()
            }
        };
        let proxy_base = match provider {
            TokenProvider::GitHub => proxy_base
                .map(|b| b.trim().to_string())
                .filter(|b| !b.is_empty()),
            _ => None,
        };
        Ok(Self {
            provider,
            target,
            proxy_base,
        })
    }

    /// Name used for extension-based type detection.
    pub fn name_hint(&self) -> &str {
        &self.target
    }

    /// Request plan for this target using `token`.
    pub fn plan(&self, token: &AccessToken) -> Result<FetchPlan, TokenAccessError> {
        match self.provider {
            TokenProvider::Dropbox => {
                let arg = serde_json::json!({ "path": self.target }).to_string();
                Ok(FetchPlan::direct(DROPBOX_DOWNLOAD_URL)
                    .with_method(Method::Post)
                    .with_header("Authorization", format!("Bearer {}", token.secret()))
                    .with_header("Dropbox-API-Arg", arg))
            }
            TokenProvider::GoogleDrive => Ok(FetchPlan::direct(format!(
                "{GDRIVE_FILES_URL}/{}?alt=media",
                self.target
            ))
            .with_header("Authorization", format!("Bearer {}", token.secret()))),
            TokenProvider::GitHub => {
                let plan = match self.proxy_base.as_deref() {
                    Some(base) => {
                        build_proxy_url(ProxyDecision::PrivateProxy, &self.target, Some(base))
                            .map_err(|_| TokenAccessError::AuthProxyRequired)?
                    }
                    None if is_github_release_url(&self.target) => {
                        return Err(TokenAccessError::AuthProxyRequired)
                    }
                    None => FetchPlan::direct(self.target.as_str()),
                };
                Ok(plan.with_header("Authorization", format!("token {}", token.secret())))
            }
        }
    }
}

/// A token-access target paired with the session's token cache.
pub struct TokenRequest<'a, S> {
    pub access: &'a TokenAccess,
    pub tokens: &'a TokenCache<S>,
}

impl<S: TokenSource> Resolver for TokenRequest<'_, S> {
    fn resolve(&self) -> anyhow::Result<FetchPlan> {
        let token = self.tokens.get_or_refresh()?;
        Ok(self.access.plan(&token)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> AccessToken {
        AccessToken::new("t0k")
    }

    #[test]
    fn provider_labels() {
        assert_eq!("Dropbox".parse::<TokenProvider>().unwrap(), TokenProvider::Dropbox);
        assert_eq!(
            "Google Drive".parse::<TokenProvider>().unwrap(),
            TokenProvider::GoogleDrive
        );
        assert_eq!("gdrive".parse::<TokenProvider>().unwrap(), TokenProvider::GoogleDrive);
        assert_eq!(" github ".parse::<TokenProvider>().unwrap(), TokenProvider::GitHub);
        assert!(matches!(
            "OneDrive".parse::<TokenProvider>(),
            Err(TokenAccessError::UnknownProvider(_))
        ));
    }

    #[test]
    fn dropbox_path_validation_and_plan() {
        assert_eq!(
            TokenAccess::new(TokenProvider::Dropbox, "data/x.csv", None).unwrap_err(),
            TokenAccessError::DropboxPathNotAbsolute
        );
        let access = TokenAccess::new(TokenProvider::Dropbox, "/data/x.csv", None).unwrap();
        let plan = access.plan(&token()).unwrap();
        assert_eq!(plan.method, Method::Post);
        assert_eq!(plan.url, "https://content.dropboxapi.com/2/files/download");
        assert_eq!(plan.headers["Authorization"], "Bearer t0k");
        assert_eq!(plan.headers["Dropbox-API-Arg"], r#"{"path":"/data/x.csv"}"#);
    }

    #[test]
    fn gdrive_accepts_url_or_bare_id() {
        let a = TokenAccess::new(
            TokenProvider::GoogleDrive,
            "https://drive.google.com/file/d/1AbCdEfGhIjK/view",
            None,
        )
        .unwrap();
        assert_eq!(a.target, "1AbCdEfGhIjK");
        let b = TokenAccess::new(TokenProvider::GoogleDrive, "1AbCdEfGhIjK", None).unwrap();
        assert_eq!(b, a);
        assert!(TokenAccess::new(TokenProvider::GoogleDrive, "short", None).is_err());

        let plan = a.plan(&token()).unwrap();
        assert_eq!(plan.method, Method::Get);
        assert_eq!(
            plan.url,
            "https://www.googleapis.com/drive/v3/files/1AbCdEfGhIjK?alt=media"
        );
        assert_eq!(plan.headers["Authorization"], "Bearer t0k");
    }

    #[test]
    fn github_direct_and_proxied() {
        assert_eq!(
            TokenAccess::new(TokenProvider::GitHub, "github.com/o/r", None).unwrap_err(),
            TokenAccessError::GithubNeedsUrl
        );

        let direct =
            TokenAccess::new(TokenProvider::GitHub, "https://github.com/o/r/raw/main/x.csv", None)
                .unwrap();
        let plan = direct.plan(&token()).unwrap();
        assert_eq!(plan.url, "https://github.com/o/r/raw/main/x.csv");
        assert_eq!(plan.headers["Authorization"], "token t0k");

        let proxied = TokenAccess::new(
            TokenProvider::GitHub,
            "https://github.com/o/r/releases/download/v1/x.parquet",
            Some("https://auth.example.com/".into()),
        )
        .unwrap();
        let plan = proxied.plan(&token()).unwrap();
        assert!(plan.url.starts_with("https://auth.example.com/?url=https%3A%2F%2Fgithub.com"));
        assert_eq!(plan.headers["Authorization"], "token t0k");
    }

    #[test]
    fn github_release_without_proxy_fails() {
        let access = TokenAccess::new(
            TokenProvider::GitHub,
            "https://github.com/o/r/releases/download/v1/x.parquet",
            Some("   ".into()),
        )
        .unwrap();
        assert_eq!(
            access.plan(&token()).unwrap_err(),
            TokenAccessError::AuthProxyRequired
        );
    }

    #[test]
    fn proxy_base_ignored_for_non_github() {
        let a = TokenAccess::new(
            TokenProvider::Dropbox,
            "/x.csv",
            Some("https://auth.example.com".into()),
        )
        .unwrap();
        assert!(a.proxy_base.is_none());
    }
}
