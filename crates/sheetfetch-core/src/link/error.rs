//! Configuration errors raised before a fetch is attempted.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    /// Private GitHub access was requested but no proxy base URL is configured.
    #[error("private GitHub access requires an auth proxy base URL")]
    MissingProxyBase,
    /// The private flag only has a meaning for GitHub resources.
    #[error("private access is only supported for GitHub URLs, got {0}")]
    PrivateRequiresGithub(String),
}
