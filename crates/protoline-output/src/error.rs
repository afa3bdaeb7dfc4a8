use protoline_frame::FrameError;
use protoline_schema::SchemaError;

/// Errors that can occur while writing through [`JsonObjectOutput`](crate::JsonObjectOutput).
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// `write_object` was called without a value.
    #[error("only registered protobuf messages are supported, the object is: null")]
    NullPayload,

    /// The value's type is not a registered message type.
    #[error("only registered protobuf messages are supported, the object type is: {type_name}")]
    UnsupportedPayload { type_name: &'static str },

    /// An event payload is not a string.
    #[error("cannot cast {found} to {expected}")]
    TypeCast {
        expected: &'static str,
        found: &'static str,
    },

    /// An attachment value is not a string.
    #[error("attachment {key:?} holds {found}, only string values are supported")]
    AttachmentType { key: String, found: &'static str },

    /// A byte window does not fit inside the source slice.
    #[error("byte range out of bounds (offset {offset}, len {len}, available {available})")]
    InvalidRange {
        offset: usize,
        len: usize,
        available: usize,
    },

    /// The message could not be converted or rendered.
    #[error("schema error: {0}")]
    Schema(#[source] SchemaError),

    /// The record could not be committed to the sink.
    #[error("record error: {0}")]
    Frame(#[from] FrameError),
}

impl OutputError {
    /// True for the caller-side type errors (`TypeCast`, `AttachmentType`).
    pub fn is_type_cast(&self) -> bool {
        matches!(
            self,
            OutputError::TypeCast { .. } | OutputError::AttachmentType { .. }
        )
    }
}

impl From<SchemaError> for OutputError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::Unregistered { type_name } => OutputError::UnsupportedPayload { type_name },
            other => OutputError::Schema(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, OutputError>;
