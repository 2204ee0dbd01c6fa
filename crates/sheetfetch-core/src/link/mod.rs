//! Link resolution: provider detection, share-link rewriting and proxy routing.
//!
//! Everything here is plain string manipulation. Nothing performs network
//! access; the output is a [`FetchPlan`](crate::resolver::FetchPlan) for the
//! fetch layer.

mod dropbox;
mod error;
mod gdrive;
mod proxy;
mod share;

pub use dropbox::rewrite_dropbox_url;
pub use error::LinkError;
pub use gdrive::{extract_gdrive_file_id, gdrive_id_from_url, rewrite_google_drive_url};
pub use proxy::{
    build_proxy_url, encode_component, is_github_release_url, needs_proxy, ProxyDecision,
    PUBLIC_PROXY_URL,
};
pub use share::{LinkResolver, ResolvedLink, ShareLink};

/// Storage provider a URL belongs to, by host substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    GitHub,
    GoogleDrive,
    Dropbox,
    Other,
}

/// Classifies a URL by case-insensitive substring match on known hostnames.
pub fn classify_provider(url: &str) -> ProviderKind {
    let lower = url.to_ascii_lowercase();
    if lower.contains("github.com") || lower.contains("raw.githubusercontent.com") {
        ProviderKind::GitHub
    } else if lower.contains("drive.google.com") || lower.contains("drive.usercontent.google.com")
    {
        ProviderKind::GoogleDrive
    } else if lower.contains("dropbox.com") {
        ProviderKind::Dropbox
    } else {
        ProviderKind::Other
    }
}
