pub mod context;
pub mod descriptor;
pub mod error;
pub mod registry;
pub mod schema;
pub mod traits;
pub mod user_tools;

pub use context::ToolContext;
pub use descriptor::{ToolDescriptor, ValidatedInput};
pub use error::{FieldError, RegistryError, ToolError, ValidationError};
pub use registry::ToolRegistry;
pub use schema::{Describe, Schema};
pub use traits::{Tool, ToolInput, ToolOutput};
pub use user_tools::user_tools;
