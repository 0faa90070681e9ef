use crate::traits::{ResultStore, StorageError, StorageResult};
use async_trait::async_trait;
use avscan_core::PluginResults;
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;

const DEFAULT_INDEX: &str = "malice";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Elasticsearch-backed [`ResultStore`].
#[derive(Clone)]
pub struct ElasticsearchStore {
    client: Client,
    base_url: String,
    index: String,
}

impl ElasticsearchStore {
    pub fn new(url: impl Into<String>) -> StorageResult<Self> {
        let base_url = url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(StorageError::ConfigError(
                "Elasticsearch URL cannot be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            index: DEFAULT_INDEX.to_string(),
        })
    }

    fn index_url(&self) -> String {
        format!("{}/{}", self.base_url, self.index)
    }
}

#[async_trait]
impl ResultStore for ElasticsearchStore {
    async fn init(&self) -> StorageResult<()> {
        let ping = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .map_err(|e| StorageError::InitFailed(format!("{} unreachable: {}", self.base_url, e)))?;
        if !ping.status().is_success() {
            return Err(StorageError::InitFailed(format!(
                "{} answered {}",
                self.base_url,
                ping.status()
            )));
        }

        let exists = self
            .client
            .head(self.index_url())
            .send()
            .await
            .map_err(|e| StorageError::InitFailed(e.to_string()))?;
        match exists.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => {
                tracing::info!(index = %self.index, "Creating Elasticsearch index");
                let created = self
                    .client
                    .put(self.index_url())
                    .send()
                    .await
                    .map_err(|e| StorageError::InitFailed(e.to_string()))?;
                if created.status().is_success() {
                    Ok(())
                } else {
                    let status = created.status().as_u16();
                    let body = created.text().await.unwrap_or_default();
                    Err(StorageError::InitFailed(format!(
                        "failed to create index {}: {} {}",
                        self.index, status, body
                    )))
                }
            }
            status => Err(StorageError::InitFailed(format!(
                "unexpected status {} checking index {}",
                status, self.index
            ))),
        }
    }

    #[tracing::instrument(skip(self, results), fields(id = %results.id, plugin = %results.name))]
    async fn store(&self, results: &PluginResults) -> StorageResult<()> {
        let data = serde_json::to_value(&results.data)
            .map_err(|e| StorageError::RequestFailed(format!("Failed to serialize results: {}", e)))?;

        let body = json!({
            "doc": {
                "plugins": {
                    results.category.as_str(): {
                        results.name.as_str(): data
                    }
                }
            },
            "doc_as_upsert": true
        });

        let url = format!("{}/_update/{}", self.index_url(), results.id);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| StorageError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::BackendError {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!("Stored plugin results");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avscan_core::{EngineVerdicts, ScanRecord, VersionInfo};
    use mockito::Matcher;

    fn results() -> PluginResults {
        let record = ScanRecord::new(
            EngineVerdicts::new("EICAR_Test_File", ""),
            VersionInfo::default(),
            "20240102".to_string(),
        )
        .with_markdown("#### F-Secure".to_string());
        PluginResults::new("abc123", record)
    }

    #[test]
    fn test_empty_url_rejected() {
        assert!(matches!(
            ElasticsearchStore::new(""),
            Err(StorageError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn test_init_creates_missing_index() {
        let mut server = mockito::Server::new_async().await;
        let ping = server.mock("GET", "/").with_status(200).create_async().await;
        let head = server
            .mock("HEAD", "/malice")
            .with_status(404)
            .create_async()
            .await;
        let create = server
            .mock("PUT", "/malice")
            .with_status(200)
            .create_async()
            .await;

        let store = ElasticsearchStore::new(server.url()).unwrap();
        store.init().await.unwrap();

        ping.assert_async().await;
        head.assert_async().await;
        create.assert_async().await;
    }

    #[tokio::test]
    async fn test_init_fails_when_unreachable() {
        let mut server = mockito::Server::new_async().await;
        let _ping = server.mock("GET", "/").with_status(503).create_async().await;

        let store = ElasticsearchStore::new(server.url()).unwrap();
        assert!(matches!(
            store.init().await,
            Err(StorageError::InitFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_store_upserts_without_markdown() {
        let mut server = mockito::Server::new_async().await;
        let update = server
            .mock("POST", "/malice/_update/abc123")
            .match_body(Matcher::PartialJson(json!({
                "doc": {
                    "plugins": {
                        "av": {
                            "fsecure": {
                                "infected": true,
                                "result": "EICAR_Test_File",
                                "updated": "20240102"
                            }
                        }
                    }
                },
                "doc_as_upsert": true
            })))
            .with_status(200)
            .create_async()
            .await;

        let store = ElasticsearchStore::new(server.url()).unwrap();
        let doc = results();
        assert!(doc.data.markdown.is_none());
        store.store(&doc).await.unwrap();

        update.assert_async().await;
    }

    #[tokio::test]
    async fn test_store_reports_backend_error() {
        let mut server = mockito::Server::new_async().await;
        let _update = server
            .mock("POST", "/malice/_update/abc123")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let store = ElasticsearchStore::new(server.url()).unwrap();
        match store.store(&results()).await {
            Err(StorageError::BackendError { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected backend error, got {:?}", other),
        }
    }
}
