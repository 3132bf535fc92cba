pub mod api;
pub mod config;
pub mod error;
pub mod mcp;
pub mod tandoor;

pub use error::{McpHttpError, Result, TandoorError};
