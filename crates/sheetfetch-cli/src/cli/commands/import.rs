//! `sheetfetch import <url>` – processed share-link import.

use anyhow::Result;
use sheetfetch_core::config::SheetfetchConfig;
use sheetfetch_core::import::{stage_download, ImportOutcome, ImportRequest};
use sheetfetch_core::link::LinkResolver;
use sheetfetch_core::token::{EnvTokenSource, TokenProvider, TokenSource};

use super::{fetch_plan, print_import, staging};

pub async fn run_import(
    cfg: &SheetfetchConfig,
    url: &str,
    private: bool,
    proxy_url: Option<String>,
    name: Option<&str>,
) -> Result<()> {
    let out = import_share_link(cfg, url, private, proxy_url, name).await?;
    print_import(&out);
    Ok(())
}

pub(super) async fn import_share_link(
    cfg: &SheetfetchConfig,
    url: &str,
    private: bool,
    proxy_url: Option<String>,
    name: Option<&str>,
) -> Result<ImportOutcome> {
    let links = LinkResolver::from_config(cfg).with_private_proxy(proxy_url);
    let link = links.resolve(url, private)?;
    let pat = if private {
        Some(EnvTokenSource::for_provider(TokenProvider::GitHub).fetch()?)
    } else {
        None
    };
    let plan = link.authorized_plan(pat.as_ref().map(|t| t.secret()))?;

    let response = fetch_plan(plan, cfg.http()).await?;
    let req = ImportRequest {
        source_label: "share_link",
        source_url: &link.direct_url,
        explicit_name: name,
    };
    stage_download(&staging(cfg), &req, &response)
}
