use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::Result;
use crate::message::Message;

/// Render a message as compact JSON using the protobuf canonical mapping.
///
/// Wrapper messages render as their bare value: `Int64` as a decimal
/// string, `Bytes` as padded base64, non-finite floats as `"NaN"`,
/// `"Infinity"` or `"-Infinity"`.
pub fn render_json(message: &Message) -> Result<String> {
    Ok(serde_json::to_string(message)?)
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Message::Bool(v) => serializer.serialize_bool(v.value),
            Message::Int32(v) => serializer.serialize_i32(v.value),
            Message::Int64(v) => serializer.collect_str(&v.value),
            Message::Float(v) => match non_finite_name(f64::from(v.value)) {
                Some(name) => serializer.serialize_str(name),
                None => serializer.serialize_f32(v.value),
            },
            Message::Double(v) => match non_finite_name(v.value) {
                Some(name) => serializer.serialize_str(name),
                None => serializer.serialize_f64(v.value),
            },
            Message::String(v) => serializer.serialize_str(&v.value),
            Message::Bytes(v) => serializer.serialize_str(&STANDARD.encode(&v.value)),
            Message::StringMap(v) => {
                if v.attachments.is_empty() {
                    return serializer.serialize_map(Some(0))?.end();
                }
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("attachments", &v.attachments)?;
                map.end()
            }
            Message::Throwable(v) => v.serialize(serializer),
            Message::Dynamic(v) => v.body.serialize(serializer),
        }
    }
}

fn non_finite_name(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("NaN")
    } else if value == f64::INFINITY {
        Some("Infinity")
    } else if value == f64::NEG_INFINITY {
        Some("-Infinity")
    } else {
        None
    }
}
