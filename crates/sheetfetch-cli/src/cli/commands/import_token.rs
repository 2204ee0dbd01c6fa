//! `sheetfetch import-token <provider> <input>` – provider API download.

use anyhow::Result;
use sheetfetch_core::config::SheetfetchConfig;
use sheetfetch_core::import::{save_raw, stage_download, ImportError, ImportRequest};
use sheetfetch_core::resolver::Resolver;
use sheetfetch_core::token::{EnvTokenSource, TokenAccess, TokenCache, TokenProvider, TokenRequest};

use super::{fetch_plan, print_import, print_raw, staging};

pub async fn run_import_token(
    cfg: &SheetfetchConfig,
    provider: &str,
    input: &str,
    proxy_url: Option<String>,
    raw: Option<&str>,
) -> Result<()> {
    let provider: TokenProvider = provider.parse()?;
    let proxy_url = proxy_url.or_else(|| cfg.private_proxy_url.clone());
    let access = TokenAccess::new(provider, input, proxy_url)?;
    let tokens = TokenCache::new(EnvTokenSource::for_provider(provider));

    let plan = TokenRequest {
        access: &access,
        tokens: &tokens,
    }
    .resolve()?;
    println!("Provider: {}", provider);
    println!("Target:   {}", access.target);

    let response = fetch_plan(plan, cfg.http()).await?;
    if response.status == 401 {
        tokens.invalidate();
        tracing::warn!("{} rejected the token", provider);
        anyhow::bail!(
            "{}: check {}",
            ImportError::Http(response.status),
            provider.env_var()
        );
    }

    let label = format!("token:{}", provider);
    match raw {
        Some(output) => {
            let out = save_raw(&staging(cfg), &label, &access.target, output, &response)?;
            print_raw(&out);
        }
        None => {
            let req = ImportRequest {
                source_label: &label,
                source_url: &access.target,
                explicit_name: Some(access.name_hint()),
            };
            let out = stage_download(&staging(cfg), &req, &response)?;
            print_import(&out);
        }
    }
    Ok(())
}
