use protoline_schema::SchemaError;

/// Errors that can occur while committing a record.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The message could not be rendered.
    #[error("record encoding failed: {0}")]
    Schema(#[from] SchemaError),

    /// The rendered record exceeds the configured maximum size.
    #[error("record too large ({size} bytes, max {max})")]
    RecordTooLarge { size: usize, max: usize },

    /// An I/O error occurred while writing or flushing the sink.
    #[error("record I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The sink stopped accepting bytes before the record was complete.
    #[error("sink closed (incomplete record)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
