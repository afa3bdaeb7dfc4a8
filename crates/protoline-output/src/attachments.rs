//! Projection of call attachments into the string map message.
//!
//! Attachments travel as a string-to-string map. String-typed maps are
//! accepted as they are; maps of loosely typed values are checked entry by
//! entry and the first non-string value fails the whole write.

use std::any::{type_name, Any};
use std::collections::BTreeMap;

use protoline_schema::MapValue;

use crate::error::{OutputError, Result};

/// A map value that may be carried as an attachment.
pub trait AttachmentValue {
    /// The string form of this value, if it is a string.
    fn as_attachment_str(&self) -> Option<&str>;

    /// Type name reported when the value is not a string.
    fn value_type_name(&self) -> &'static str;
}

impl AttachmentValue for str {
    fn as_attachment_str(&self) -> Option<&str> {
        Some(self)
    }

    fn value_type_name(&self) -> &'static str {
        "str"
    }
}

impl AttachmentValue for String {
    fn as_attachment_str(&self) -> Option<&str> {
        Some(self)
    }

    fn value_type_name(&self) -> &'static str {
        type_name::<String>()
    }
}

impl AttachmentValue for dyn Any {
    fn as_attachment_str(&self) -> Option<&str> {
        any_as_str(self)
    }

    fn value_type_name(&self) -> &'static str {
        "dyn Any"
    }
}

impl AttachmentValue for dyn Any + Send + Sync {
    fn as_attachment_str(&self) -> Option<&str> {
        any_as_str(self)
    }

    fn value_type_name(&self) -> &'static str {
        "dyn Any"
    }
}

impl AttachmentValue for serde_json::Value {
    fn as_attachment_str(&self) -> Option<&str> {
        self.as_str()
    }

    fn value_type_name(&self) -> &'static str {
        match self {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "bool",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        }
    }
}

impl<T: AttachmentValue + ?Sized> AttachmentValue for Box<T> {
    fn as_attachment_str(&self) -> Option<&str> {
        (**self).as_attachment_str()
    }

    fn value_type_name(&self) -> &'static str {
        (**self).value_type_name()
    }
}

impl<T: AttachmentValue + ?Sized> AttachmentValue for &T {
    fn as_attachment_str(&self) -> Option<&str> {
        (**self).as_attachment_str()
    }

    fn value_type_name(&self) -> &'static str {
        (**self).value_type_name()
    }
}

fn any_as_str(value: &dyn Any) -> Option<&str> {
    if let Some(text) = value.downcast_ref::<String>() {
        return Some(text);
    }
    value.downcast_ref::<&'static str>().copied()
}

/// Build the string map message from an attachment map.
///
/// Fails with [`OutputError::AttachmentType`] naming the first offending key.
pub fn project_attachments<'a, I, K, V>(attachments: I) -> Result<MapValue>
where
    I: IntoIterator<Item = (&'a K, &'a V)>,
    K: AsRef<str> + ?Sized + 'a,
    V: AttachmentValue + ?Sized + 'a,
{
    let mut projected = BTreeMap::new();
    for (key, value) in attachments {
        let key: &str = key.as_ref();
        let Some(text) = value.as_attachment_str() else {
            return Err(OutputError::AttachmentType {
                key: key.to_string(),
                found: value.value_type_name(),
            });
        };
        projected.insert(key.to_string(), text.to_string());
    }
    Ok(MapValue::new(projected))
}
