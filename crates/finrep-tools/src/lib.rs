//! FINREP Tools: everything that talks to the outside world
//!
//! - [`ToolInvoker`] routes `{tool_name, parameters}` calls to the four
//!   domain services through a [`ToolTransport`].
//! - [`schema`] holds typed service responses.
//! - [`fallback`] supplies deterministic payloads when a call fails.
//! - [`ChatCompletionClient`] implements the reasoning boundary.

pub mod chat;
pub mod error;
pub mod fallback;
pub mod invoker;
pub mod schema;
pub mod service;
pub mod transport;

pub use chat::ChatCompletionClient;
pub use error::ToolError;
pub use fallback::fallback_for;
pub use invoker::{ServiceHealth, ToolInvoker};
pub use schema::{
    ComplianceResponse, ExtractionResponse, MarketResponse, PublishedReport, ReportEntry,
    ReportListing,
};
pub use service::{ServiceEndpoints, ServiceName};
pub use transport::{HttpToolTransport, ToolTransport};
