use protoline_frame::{Event, MOCK_HEARTBEAT_EVENT};
use tracing::trace;

use crate::error::{OutputError, Result};

/// Resolve an event to the text that goes on the wire.
///
/// The heartbeat sentinel becomes [`MOCK_HEARTBEAT_EVENT`]; text passes
/// through unchanged; anything else is a cast failure.
pub fn resolve_event<'a>(event: Event<'a>) -> Result<&'a str> {
    match event {
        Event::Heartbeat => {
            trace!("substituting mock heartbeat event");
            Ok(MOCK_HEARTBEAT_EVENT)
        }
        Event::Text(text) => Ok(text),
        Event::Other { type_name } => Err(OutputError::TypeCast {
            expected: "string",
            found: type_name,
        }),
    }
}
