//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `broadcast` - Normalized broadcasts and the partial aggregation report
//! - `channel` - Registered channel listing
//! - `error` - Common error response DTOs
//! - `health` - Health and readiness checks
//! - `viewer` - Viewer selection query parameters

mod broadcast;
mod channel;
mod error;
mod health;
mod viewer;

pub use broadcast::{AggregationReportResponse, BroadcastResponse, PlatformFailureResponse};
pub use channel::ChannelResponse;
pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use viewer::ViewerQuery;
