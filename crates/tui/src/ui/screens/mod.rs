pub mod analytics;
pub mod dashboard;
pub mod expenses;
pub mod modal;
pub mod placeholder;
pub mod transactions;
