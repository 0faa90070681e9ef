//! `avscan scan <path>`: scan one file, then store, deliver or print the result.

use anyhow::{Context, Result};
use avscan_core::constants::PLUGIN_NAME;
use avscan_core::{Config, PluginResults, ScanError, ScanRecord, ScanReport};
use avscan_infra::{WebhookService, WebhookServiceConfig};
use avscan_services::{render_markdown, ScanOrchestrator};
use avscan_storage::{create_store, scan_id};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Output and delivery choices for a single scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub table: bool,
    pub callback: bool,
    pub proxy: bool,
    pub timeout_secs: u64,
}

pub async fn run(config: &Config, path: &Path, options: &ScanOptions) -> Result<()> {
    let path = resolve(path).await?;

    let orchestrator = ScanOrchestrator::from_config(config);
    let record = orchestrator
        .scan_file(&path, Duration::from_secs(options.timeout_secs))
        .await;
    let markdown = render_markdown(&record);
    let record = record.with_markdown(markdown);

    if config.elasticsearch_url.is_some() {
        let id = resolve_scan_id(config, &path).await?;
        store_results(config, &id, &record).await?;
    }

    if options.table {
        println!("{}", record.markdown.as_deref().unwrap_or_default());
        return Ok(());
    }

    let record = record.without_markdown();
    if options.callback {
        let id = resolve_scan_id(config, &path).await?;
        return deliver(config, options, &id, &record).await;
    }

    println!("{}", render_json(record)?);
    Ok(())
}

/// Absolute form of `path`; fails when the file does not exist.
async fn resolve(path: &Path) -> Result<PathBuf> {
    tokio::fs::canonicalize(path)
        .await
        .with_context(|| format!("cannot scan {}", path.display()))
}

async fn resolve_scan_id(config: &Config, path: &Path) -> Result<String> {
    scan_id(path, config.scan_id.as_deref())
        .await
        .with_context(|| format!("failed to hash {}", path.display()))
}

/// Index the record. An unreachable cluster is fatal; a failed upsert is
/// logged and the scan result is still printed.
async fn store_results(config: &Config, id: &str, record: &ScanRecord) -> Result<()> {
    let Some(store) = create_store(config)
        .await
        .map_err(|e| ScanError::StorageInitFailed(e.to_string()))?
    else {
        return Ok(());
    };

    if let Err(e) = store.store(&PluginResults::new(id, record.clone())).await {
        tracing::error!(
            error = %e,
            id,
            "failed to index malice/{} results",
            PLUGIN_NAME
        );
    }
    Ok(())
}

/// POST the report to the webhook and print its answer. Delivery failures
/// are logged only.
async fn deliver(config: &Config, options: &ScanOptions, id: &str, record: &ScanRecord) -> Result<()> {
    let endpoint = config
        .webhook_endpoint
        .clone()
        .context("--callback requires MALICE_ENDPOINT")?;
    let proxy = if options.proxy {
        config.webhook_proxy.clone()
    } else {
        None
    };

    let service = WebhookService::new(WebhookServiceConfig::new(endpoint).with_proxy(proxy))?;
    match service.deliver(id, record).await {
        Ok(response) => println!("{}", response.body),
        Err(e) => tracing::error!(error = %e, "Failed to deliver scan results"),
    }
    Ok(())
}

fn render_json(record: ScanRecord) -> Result<String> {
    serde_json::to_string(&ScanReport::from(record)).context("failed to serialize scan results")
}
