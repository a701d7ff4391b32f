pub mod client;
pub mod health;
pub mod types;

pub use client::{BackendClient, BackendError};
pub use health::{HealthReport, HealthResponse};
pub use types::{ReportStat, ReportSummary};
