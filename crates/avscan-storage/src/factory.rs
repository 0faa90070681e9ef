use crate::{ElasticsearchStore, ResultStore, StorageResult};
use avscan_core::Config;
use std::sync::Arc;

/// Create the configured result store, if any.
///
/// Returns `Ok(None)` when no Elasticsearch URL is configured. The returned
/// store has already passed [`ResultStore::init`].
pub async fn create_store(config: &Config) -> StorageResult<Option<Arc<dyn ResultStore>>> {
    let Some(url) = config.elasticsearch_url.as_deref() else {
        return Ok(None);
    };

    let store = ElasticsearchStore::new(url)?;
    store.init().await?;
    tracing::info!(url = %url, "Elasticsearch store initialized");
    Ok(Some(Arc::new(store)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_store_without_url() {
        let config = Config::default();
        assert!(create_store(&config).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_created_when_reachable() {
        let mut server = mockito::Server::new_async().await;
        let _ping = server.mock("GET", "/").with_status(200).create_async().await;
        let _head = server
            .mock("HEAD", "/malice")
            .with_status(200)
            .create_async()
            .await;

        let config = Config {
            elasticsearch_url: Some(server.url()),
            ..Config::default()
        };
        assert!(create_store(&config).await.unwrap().is_some());
    }
}
