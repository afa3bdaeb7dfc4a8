//! Schema-constrained JSON object output for RPC payloads.
//!
//! [`JsonObjectOutput`] is the sink an RPC transport writes arguments,
//! return values, errors, events and attachments through. Every write
//! produces exactly one flushed, newline-terminated JSON record, and only
//! registered message types are accepted.

pub mod attachments;
pub mod error;
pub mod event;
pub mod output;

pub use attachments::{project_attachments, AttachmentValue};
pub use error::{OutputError, Result};
pub use event::resolve_event;
pub use output::JsonObjectOutput;

pub use protoline_frame::{Event, LineTerminator, RecordConfig, HEARTBEAT_EVENT, MOCK_HEARTBEAT_EVENT};
pub use protoline_schema::{MessageRegistry, RegistryConfig};
