//! `sheetfetch resolve <url>` – show the rewrite and fetch plan.

use anyhow::Result;
use sheetfetch_core::config::SheetfetchConfig;
use sheetfetch_core::link::LinkResolver;

pub fn run_resolve(
    cfg: &SheetfetchConfig,
    url: &str,
    private: bool,
    proxy_url: Option<String>,
) -> Result<()> {
    let links = LinkResolver::from_config(cfg).with_private_proxy(proxy_url);
    let link = links.resolve(url, private)?;

    println!("Source:    {}", link.source_url);
    if link.gdrive_rewritten {
        println!("           [Google Drive URL converted]");
    }
    if link.dropbox_rewritten {
        println!("           [Dropbox URL converted]");
    }
    println!("Direct:    {}", link.direct_url);
    println!("Provider:  {:?}", link.provider);
    println!("Proxy:     {:?}", link.decision);
    println!("Fetch:     {} {}", link.plan.method.as_str(), link.plan.url);
    if private {
        println!("Headers:   Authorization (token from GITHUB_PAT)");
    }
    Ok(())
}
