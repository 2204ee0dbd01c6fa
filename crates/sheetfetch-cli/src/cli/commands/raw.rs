//! `sheetfetch raw <url> <output>` – unprocessed download of any file.

use anyhow::Result;
use sheetfetch_core::config::SheetfetchConfig;
use sheetfetch_core::import::{save_raw, RawOutcome};
use sheetfetch_core::link::LinkResolver;

use super::{fetch_plan, print_raw, staging};

pub async fn run_raw(cfg: &SheetfetchConfig, url: &str, output: &str) -> Result<()> {
    let out = raw_share_link(cfg, url, output).await?;
    print_raw(&out);
    Ok(())
}

/// Raw mode serves public links only; private files go through token access.
pub(super) async fn raw_share_link(
    cfg: &SheetfetchConfig,
    url: &str,
    output: &str,
) -> Result<RawOutcome> {
    let link = LinkResolver::from_config(cfg).resolve(url, false)?;
    let response = fetch_plan(link.plan.clone(), cfg.http()).await?;
    save_raw(&staging(cfg), "raw", &link.direct_url, output, &response)
}
