use std::sync::Arc;

use async_trait::async_trait;

use loan_core::api::{BackendConfig, ClientFactory};
use loan_core::{ApiError, MarketplaceClient, SessionContext};

use crate::client::HttpMarketplaceClient;

/// [`ClientFactory`] for the REST backend.
///
/// Register this with a [`loan_core::api::ClientRegistry`] to make the
/// `"http"` backend available:
///
/// ```rust
/// use loan_core::api::ClientRegistry;
/// use loan_http::HttpClientFactory;
///
/// let mut registry = ClientRegistry::new();
/// registry.register(Box::new(HttpClientFactory));
/// assert_eq!(registry.available_backends(), vec!["http"]);
/// ```
pub struct HttpClientFactory;

#[async_trait]
impl ClientFactory for HttpClientFactory {
    fn backend_name(&self) -> &'static str {
        "http"
    }

    /// `config.base_url` must be an absolute URL such as
    /// `http://localhost:8080`. No request is made until the first call.
    async fn create(
        &self,
        config: &BackendConfig,
        session: Arc<SessionContext>,
    ) -> Result<Box<dyn MarketplaceClient>, ApiError> {
        let client = HttpMarketplaceClient::new(&config.base_url, session)?;
        Ok(Box::new(client))
    }
}

#[cfg(test)]
mod tests {
    use loan_core::api::ClientRegistry;

    use super::*;

    #[tokio::test]
    async fn registry_builds_http_client() {
        let mut registry = ClientRegistry::new();
        registry.register(Box::new(HttpClientFactory));

        let client = registry
            .create(&BackendConfig::default(), Arc::new(SessionContext::in_memory()))
            .await;

        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn bad_base_url_is_reported() {
        let config = BackendConfig {
            backend: "http".to_string(),
            base_url: "not a url".to_string(),
        };

        let result = HttpClientFactory
            .create(&config, Arc::new(SessionContext::in_memory()))
            .await;

        assert!(matches!(result, Err(ApiError::Configuration(_))));
    }
}
