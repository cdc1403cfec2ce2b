pub mod api;
pub mod calculations;
pub mod calculator;
pub mod export;
pub mod history;
pub mod models;
pub mod routes;
pub mod session;
pub mod sorting;
pub mod validation;

pub use api::{ApiError, MarketplaceClient};
pub use calculations::{AmortizationEngine, Computation, NotReady};
pub use calculator::CalculatorSession;
pub use history::CalculationHistory;
pub use models::*;
pub use routes::{Route, RouteDecision};
pub use session::SessionContext;
pub use sorting::{SortField, SortState};
