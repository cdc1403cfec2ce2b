pub mod client;
pub mod factory;

pub use client::HttpMarketplaceClient;
pub use factory::HttpClientFactory;
