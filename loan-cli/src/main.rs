use std::io;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, warn};

use loan_cli::logging::{enable_file_logging, init_logging};
use loan_cli::{App, AppConfig, Cli, build_registry};
use loan_core::SessionContext;

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?.apply(cli.overrides());

    init_logging(&config.logging.level);
    if let Some(path) = &config.logging.file {
        if let Err(e) = enable_file_logging(path) {
            warn!("{e:#}");
        }
    }

    let token_file = config.token_file();
    debug!(path = %token_file.display(), "session token file");
    let session = Arc::new(SessionContext::with_file(token_file));

    let backend = config.backend_config();
    debug!(backend = %backend.backend, base_url = %backend.base_url, "connecting");
    let client = build_registry()
        .create(&backend, session.clone())
        .await
        .with_context(|| format!("cannot set up the '{}' backend", backend.backend))?;

    let app = App::new(session, Arc::from(client));
    let mut stdout = io::stdout().lock();
    app.run(cli.command, io::stdin().lock(), &mut stdout).await
}
