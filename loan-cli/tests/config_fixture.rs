//! Loads the sample `loan-cli.toml` from disk and checks the resolved values.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;

use loan_cli::config::Overrides;
use loan_cli::{AppConfig, build_registry};
use loan_core::SessionContext;

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("loan-cli.toml")
}

#[test]
fn fixture_file_loads() {
    let config = AppConfig::load(Some(&fixture_path())).unwrap();

    assert_eq!(config.backend.base_url, "https://loans.example.com/api/");
    assert_eq!(config.logging.level, "loan_http=debug,warn");
    assert_eq!(config.logging.file, None);
    assert_eq!(
        config.token_file(),
        PathBuf::from("/var/tmp/loan-cli-test/token")
    );
}

#[test]
fn flags_override_fixture_values() {
    let config = AppConfig::load(Some(&fixture_path()))
        .unwrap()
        .apply(Overrides {
            backend: Some("mock".to_string()),
            log_file: Some(PathBuf::from("cli.log")),
            ..Overrides::default()
        });

    let backend = config.backend_config();
    assert_eq!(backend.backend, "mock");
    assert_eq!(backend.base_url, "https://loans.example.com/api/");
    assert_eq!(config.logging.file, Some(PathBuf::from("cli.log")));
}

#[tokio::test]
async fn fixture_backend_builds_a_client() {
    let config = AppConfig::load(Some(&fixture_path())).unwrap();

    let client = build_registry()
        .create(
            &config.backend_config(),
            std::sync::Arc::new(SessionContext::in_memory()),
        )
        .await;

    assert!(client.is_ok());
}

#[tokio::test]
async fn unknown_backend_is_reported() {
    let config = AppConfig::default().apply(Overrides {
        backend: Some("grpc".to_string()),
        ..Overrides::default()
    });

    let err = build_registry()
        .create(
            &config.backend_config(),
            std::sync::Arc::new(SessionContext::in_memory()),
        )
        .await
        .err()
        .unwrap();

    assert!(err.to_string().contains("unknown backend 'grpc'"));
}
