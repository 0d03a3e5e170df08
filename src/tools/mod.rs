//! Tool surface over the registry service.
//!
//! Each registry operation is exposed as a named tool with a JSON input
//! schema. Results are rendered as text holding pretty-printed JSON.

mod catalog;
mod dispatch;
pub mod render;

pub use catalog::{ToolDefinition, ToolName, UnknownToolError, catalog};
pub use dispatch::{ToolDispatchError, ToolDispatcher};
pub use render::ToolOutput;
