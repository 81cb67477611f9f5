pub use breakdown::{Breakdown, CategoryShare};
pub use currency::Currency;
pub use dashboard::{Dashboard, DashboardModel, RecentTransaction};
pub use error::{EngineError, FormError, LoadError};
pub use gateway::{Gateway, GatewayError, GatewayResult, Operation};
pub use insights::{Insight, InsightKind};
pub use memory::MemoryGateway;
pub use money::MoneyCents;
pub use palette::ColorToken;
pub use summary::SpendingSummary;

pub mod breakdown;
mod currency;
pub mod dashboard;
pub mod diagnostics;
mod error;
pub mod expenses;
pub mod forms;
mod gateway;
pub mod insights;
pub mod memory;
mod money;
pub mod palette;
pub mod summary;
