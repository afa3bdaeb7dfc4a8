/// Errors raised by the message registry and JSON rendering.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The runtime type is not a registered message type.
    #[error("only registered protobuf messages are supported, the object type is: {type_name}")]
    Unregistered { type_name: &'static str },

    /// The message could not be rendered as JSON.
    #[error("failed to render message as JSON: {0}")]
    Render(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
