//! Webhook delivery of scan reports.
//!
//! Deliveries are single-shot: a failure is reported to the caller, who logs
//! it. The scan result itself is never affected.

use anyhow::{Context, Result};
use avscan_core::constants::SCAN_ID_HEADER;
use avscan_core::{ScanError, ScanRecord, ScanReport};
use reqwest::{Client, Proxy};
use std::time::Duration;

/// Configuration for webhook service
#[derive(Clone, Debug)]
pub struct WebhookServiceConfig {
    pub endpoint: String,
    pub proxy: Option<String>,
    pub timeout_seconds: u64,
}

impl WebhookServiceConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            proxy: None,
            timeout_seconds: 30,
        }
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }
}

/// Status and body returned by the webhook endpoint.
#[derive(Debug, Clone)]
pub struct DeliveryResponse {
    pub status_code: u16,
    pub body: String,
}

/// Service for delivering scan reports to the configured endpoint
#[derive(Clone)]
pub struct WebhookService {
    http_client: Client,
    endpoint: String,
}

impl WebhookService {
    pub fn new(config: WebhookServiceConfig) -> Result<Self> {
        let mut builder = Client::builder().timeout(Duration::from_secs(config.timeout_seconds));

        if let Some(proxy) = config.proxy.as_deref() {
            let proxy = Proxy::all(proxy).with_context(|| format!("Invalid proxy URL: {}", proxy))?;
            builder = builder.proxy(proxy);
        }

        let http_client = builder
            .build()
            .context("Failed to create HTTP client for webhooks")?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint,
        })
    }

    /// POST the report (without the rendered table) tagged with `scan_id`.
    #[tracing::instrument(skip(self, record), fields(endpoint = %self.endpoint))]
    pub async fn deliver(
        &self,
        scan_id: &str,
        record: &ScanRecord,
    ) -> Result<DeliveryResponse, ScanError> {
        let report = ScanReport::from(record.clone().without_markdown());
        let payload = serde_json::to_string(&report)
            .map_err(|e| ScanError::DeliveryFailed(format!("Failed to serialize report: {}", e)))?;

        let response = self
            .http_client
            .post(&self.endpoint)
            .header(SCAN_ID_HEADER, scan_id)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| ScanError::DeliveryFailed(e.to_string()))?;

        let status_code = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        if !(200..300).contains(&status_code) {
            return Err(ScanError::DeliveryFailed(format!(
                "endpoint answered {}: {}",
                status_code, body
            )));
        }

        tracing::info!(status_code, "Webhook delivered");
        Ok(DeliveryResponse { status_code, body })
    }
}
