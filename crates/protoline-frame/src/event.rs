//! Event payloads and the heartbeat identities.
//!
//! A heartbeat is signalled by the [`Event::Heartbeat`] tag, never by
//! comparing text: a text payload that happens to read `"H"` is ordinary
//! data.

use std::any::{type_name, Any};

/// Wire value transmitted in place of the heartbeat sentinel.
pub const MOCK_HEARTBEAT_EVENT: &str = "H";

/// The no-op keep-alive event.
pub const HEARTBEAT_EVENT: Event<'static> = Event::Heartbeat;

/// Payload of an event write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    /// Keep-alive sentinel.
    Heartbeat,
    /// Text event data.
    Text(&'a str),
    /// A payload of some other type; carries the type name for diagnostics.
    Other { type_name: &'static str },
}

impl<'a> Event<'a> {
    /// Classify an arbitrary payload.
    ///
    /// An `Event` is returned as it is. `String` and `&'static str` become
    /// [`Event::Text`]; any other type (including a non-static `&str`) is
    /// [`Event::Other`].
    pub fn payload<T: Any>(value: &'a T) -> Self {
        let any = value as &dyn Any;
        if let Some(event) = any.downcast_ref::<Event<'static>>() {
            return *event;
        }
        if let Some(text) = any.downcast_ref::<String>() {
            return Event::Text(text);
        }
        if let Some(text) = any.downcast_ref::<&'static str>() {
            return Event::Text(text);
        }
        Event::Other {
            type_name: type_name::<T>(),
        }
    }

    pub fn is_heartbeat(&self) -> bool {
        matches!(self, Event::Heartbeat)
    }
}

impl<'a> From<&'a str> for Event<'a> {
    fn from(value: &'a str) -> Self {
        Event::Text(value)
    }
}

impl<'a> From<&'a String> for Event<'a> {
    fn from(value: &'a String) -> Self {
        Event::Text(value)
    }
}
