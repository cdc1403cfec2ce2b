use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::client::MarketplaceClient;
use super::error::ApiError;
use crate::session::SessionContext;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Which backend to talk to and where it lives.
///
/// `backend` must match the [`ClientFactory::backend_name`] of a registered
/// factory. `base_url` is handed to that factory unchanged.
///
/// | backend | base_url examples          |
/// |---------|----------------------------|
/// | `http`  | `http://localhost:8080`    |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub backend: String,
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            backend: "http".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// One per backend implementation, registered with a [`ClientRegistry`] at
/// startup.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    async fn create(
        &self,
        config: &BackendConfig,
        session: Arc<SessionContext>,
    ) -> Result<Box<dyn MarketplaceClient>, ApiError>;
}

/// [`ClientFactory`] instances keyed by backend name.
pub struct ClientRegistry {
    factories: HashMap<&'static str, Box<dyn ClientFactory>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Replaces any factory already registered under the same name.
    pub fn register(
        &mut self,
        factory: Box<dyn ClientFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Builds a client with the factory matching `config.backend`.
    ///
    /// # Errors
    /// * [`ApiError::Configuration`] when no factory has that name.
    /// * Any error the chosen factory returns.
    pub async fn create(
        &self,
        config: &BackendConfig,
        session: Arc<SessionContext>,
    ) -> Result<Box<dyn MarketplaceClient>, ApiError> {
        let factory = self.factories.get(config.backend.as_str()).ok_or_else(|| {
            ApiError::Configuration(format!(
                "unknown backend '{}'; available: {:?}",
                config.backend,
                self.available_backends()
            ))
        })?;

        factory.create(config, session).await
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::api::testing::StubClient;

    /// Flips its flag when `create` runs so tests can prove dispatch.
    struct StubFactory {
        name: &'static str,
        called: Arc<AtomicBool>,
    }

    #[async_trait]
    impl ClientFactory for StubFactory {
        fn backend_name(&self) -> &'static str {
            self.name
        }

        async fn create(
            &self,
            _config: &BackendConfig,
            _session: Arc<SessionContext>,
        ) -> Result<Box<dyn MarketplaceClient>, ApiError> {
            self.called.store(true, Ordering::SeqCst);
            Ok(Box::new(StubClient::default()))
        }
    }

    struct FailingFactory;

    #[async_trait]
    impl ClientFactory for FailingFactory {
        fn backend_name(&self) -> &'static str {
            "failing"
        }

        async fn create(
            &self,
            _config: &BackendConfig,
            _session: Arc<SessionContext>,
        ) -> Result<Box<dyn MarketplaceClient>, ApiError> {
            Err(ApiError::Transport("intentional failure".to_string()))
        }
    }

    fn stub_factory(name: &'static str) -> (Box<dyn ClientFactory>, Arc<AtomicBool>) {
        let flag = Arc::new(AtomicBool::new(false));
        (
            Box::new(StubFactory {
                name,
                called: flag.clone(),
            }),
            flag,
        )
    }

    fn config(backend: &str) -> BackendConfig {
        BackendConfig {
            backend: backend.to_string(),
            base_url: "http://example.invalid".to_string(),
        }
    }

    fn session() -> Arc<SessionContext> {
        Arc::new(SessionContext::in_memory())
    }

    #[test]
    fn default_config_points_at_local_backend() {
        let cfg = BackendConfig::default();

        assert_eq!(cfg.backend, "http");
        assert_eq!(cfg.base_url, "http://localhost:8080");
    }

    #[test]
    fn new_registry_has_no_backends() {
        assert!(ClientRegistry::default().available_backends().is_empty());
    }

    #[test]
    fn available_backends_is_sorted() {
        let mut reg = ClientRegistry::new();
        let (f1, _) = stub_factory("http");
        let (f2, _) = stub_factory("grpc");
        reg.register(f1);
        reg.register(f2);

        assert_eq!(reg.available_backends(), vec!["grpc", "http"]);
    }

    #[test]
    fn duplicate_registration_replaces_previous() {
        let mut reg = ClientRegistry::new();
        let (old, _) = stub_factory("http");
        let (new, _) = stub_factory("http");
        reg.register(old);
        reg.register(new);

        assert_eq!(reg.available_backends(), vec!["http"]);
    }

    #[tokio::test]
    async fn create_calls_only_matching_factory() {
        let mut reg = ClientRegistry::new();
        let (http, http_called) = stub_factory("http");
        let (grpc, grpc_called) = stub_factory("grpc");
        reg.register(http);
        reg.register(grpc);

        let result = reg.create(&config("http"), session()).await;

        assert!(result.is_ok());
        assert!(http_called.load(Ordering::SeqCst));
        assert!(!grpc_called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn unknown_backend_names_requested_and_available() {
        let mut reg = ClientRegistry::new();
        let (f, _) = stub_factory("http");
        reg.register(f);

        match reg.create(&config("carrier-pigeon"), session()).await {
            Err(ApiError::Configuration(msg)) => {
                assert!(msg.contains("carrier-pigeon"));
                assert!(msg.contains("http"));
            }
            Err(other) => panic!("expected Configuration error, got {other:#?}"),
            Ok(_) => panic!("expected Configuration error, got a client"),
        }
    }

    #[tokio::test]
    async fn create_propagates_factory_error() {
        let mut reg = ClientRegistry::new();
        reg.register(Box::new(FailingFactory));

        let err = reg.create(&config("failing"), session()).await.err();

        assert_eq!(err, Some(ApiError::Transport("intentional failure".to_string())));
    }
}
