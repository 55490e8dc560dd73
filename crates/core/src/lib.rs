pub mod error;
pub mod gateway;
pub mod introspection;
pub mod metrics;
pub mod types;

pub use error::GatewayError;
pub use gateway::Gateway;
pub use introspection::describe_tools;
pub use metrics::{Metrics, MetricsSnapshot};
pub use types::*;
