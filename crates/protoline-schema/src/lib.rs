//! Wrapper message contract and type registry for protoline JSON records.
//!
//! Every value that crosses the wire is one of a closed set of wrapper
//! messages (bool, int32, int64, float, double, string, bytes, string map)
//! or the generic throwable message. The [`MessageRegistry`] decides which
//! runtime types are admitted and renders admitted messages using the
//! protobuf canonical JSON mapping.

pub mod config;
pub mod error;
pub mod json;
pub mod message;
pub mod registry;
pub mod throwable;

pub use config::RegistryConfig;
pub use error::{Result, SchemaError};
pub use json::render_json;
pub use message::{
    BoolValue, BytesValue, DoubleValue, DynamicMessage, FloatValue, Int32Value, Int64Value,
    MapValue, Message, StringValue,
};
pub use registry::MessageRegistry;
pub use throwable::{StackTraceElement, ThrowableProto};
