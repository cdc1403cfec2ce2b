pub mod app;
pub mod cli;
pub mod config;
pub mod logging;
pub mod prompt;
pub mod render;
pub mod utils;

pub use app::{App, build_registry};
pub use cli::Cli;
pub use config::AppConfig;
