pub mod config;
pub mod schema_context;
pub mod sql_runner;
pub mod tool_error;
pub mod tool_executor;
pub mod types;

pub use config::DatabaseConfig;
pub use tool_error::ToolError;
pub use tool_executor::ToolExecutor;
pub use types::*;
