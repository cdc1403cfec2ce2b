pub mod client;
pub mod error;
pub mod factory;
pub mod testing;

pub use client::{MarketplaceClient, apply_to_lenders};
pub use error::{ApiError, Operation, user_message};
pub use factory::{BackendConfig, ClientFactory, ClientRegistry, DEFAULT_BASE_URL};
