use std::any::TypeId;
use std::collections::BTreeMap;

use bytes::Bytes;

use crate::throwable::ThrowableProto;

pub const BOOL_VALUE: &str = "google.protobuf.BoolValue";
pub const INT32_VALUE: &str = "google.protobuf.Int32Value";
pub const INT64_VALUE: &str = "google.protobuf.Int64Value";
pub const FLOAT_VALUE: &str = "google.protobuf.FloatValue";
pub const DOUBLE_VALUE: &str = "google.protobuf.DoubleValue";
pub const STRING_VALUE: &str = "google.protobuf.StringValue";
pub const BYTES_VALUE: &str = "google.protobuf.BytesValue";
pub const MAP_VALUE: &str = "org.apache.dubbo.common.serialize.protobuf.support.wrapper.MapValue.Map";
pub const THROWABLE_PROTO: &str =
    "org.apache.dubbo.common.serialize.protobuf.support.wrapper.ThrowablePB.ThrowableProto";

/// Wrapper for a single `bool`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoolValue {
    pub value: bool,
}

/// Wrapper for a single `i32`. Narrower integers are widened into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Int32Value {
    pub value: i32,
}

/// Wrapper for a single `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Int64Value {
    pub value: i64,
}

/// Wrapper for a single `f32`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FloatValue {
    pub value: f32,
}

/// Wrapper for a single `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DoubleValue {
    pub value: f64,
}

/// Wrapper for a single UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StringValue {
    pub value: String,
}

/// Wrapper for a single byte sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BytesValue {
    pub value: Bytes,
}

/// String-to-string map used to carry call attachments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MapValue {
    pub attachments: BTreeMap<String, String>,
}

impl BoolValue {
    pub fn new(value: bool) -> Self {
        Self { value }
    }
}

impl Int32Value {
    pub fn new(value: i32) -> Self {
        Self { value }
    }
}

impl Int64Value {
    pub fn new(value: i64) -> Self {
        Self { value }
    }
}

impl FloatValue {
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl DoubleValue {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl StringValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl BytesValue {
    pub fn new(value: impl Into<Bytes>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Copy exactly `data[offset..offset + len]`, or `None` if the window
    /// does not fit inside `data`.
    pub fn copy_from_range(data: &[u8], offset: usize, len: usize) -> Option<Self> {
        let end = offset.checked_add(len)?;
        let window = data.get(offset..end)?;
        Some(Self {
            value: Bytes::copy_from_slice(window),
        })
    }
}

impl MapValue {
    pub fn new(attachments: BTreeMap<String, String>) -> Self {
        Self { attachments }
    }

    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.attachments.len()
    }
}

impl FromIterator<(String, String)> for MapValue {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            attachments: iter.into_iter().collect(),
        }
    }
}

/// A registered message type outside the built-in wrapper family, already
/// rendered to its JSON form.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicMessage {
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub body: serde_json::Value,
}

/// A message the sink is able to render.
///
/// The wrapper variants and `Throwable` form the fixed schema; `Dynamic`
/// carries anything else admitted by a [`MessageRegistry`](crate::MessageRegistry).
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Bool(BoolValue),
    Int32(Int32Value),
    Int64(Int64Value),
    Float(FloatValue),
    Double(DoubleValue),
    String(StringValue),
    Bytes(BytesValue),
    StringMap(MapValue),
    Throwable(ThrowableProto),
    Dynamic(DynamicMessage),
}

impl Message {
    /// Fully qualified message name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Message::Bool(_) => BOOL_VALUE,
            Message::Int32(_) => INT32_VALUE,
            Message::Int64(_) => INT64_VALUE,
            Message::Float(_) => FLOAT_VALUE,
            Message::Double(_) => DOUBLE_VALUE,
            Message::String(_) => STRING_VALUE,
            Message::Bytes(_) => BYTES_VALUE,
            Message::StringMap(_) => MAP_VALUE,
            Message::Throwable(_) => THROWABLE_PROTO,
            Message::Dynamic(msg) => msg.type_name,
        }
    }

    /// Runtime type the registry checks membership against.
    pub fn payload_type_id(&self) -> TypeId {
        match self {
            Message::Bool(_) => TypeId::of::<BoolValue>(),
            Message::Int32(_) => TypeId::of::<Int32Value>(),
            Message::Int64(_) => TypeId::of::<Int64Value>(),
            Message::Float(_) => TypeId::of::<FloatValue>(),
            Message::Double(_) => TypeId::of::<DoubleValue>(),
            Message::String(_) => TypeId::of::<StringValue>(),
            Message::Bytes(_) => TypeId::of::<BytesValue>(),
            Message::StringMap(_) => TypeId::of::<MapValue>(),
            Message::Throwable(_) => TypeId::of::<ThrowableProto>(),
            Message::Dynamic(msg) => msg.type_id,
        }
    }
}

impl From<BoolValue> for Message {
    fn from(value: BoolValue) -> Self {
        Message::Bool(value)
    }
}

impl From<Int32Value> for Message {
    fn from(value: Int32Value) -> Self {
        Message::Int32(value)
    }
}

impl From<Int64Value> for Message {
    fn from(value: Int64Value) -> Self {
        Message::Int64(value)
    }
}

impl From<FloatValue> for Message {
    fn from(value: FloatValue) -> Self {
        Message::Float(value)
    }
}

impl From<DoubleValue> for Message {
    fn from(value: DoubleValue) -> Self {
        Message::Double(value)
    }
}

impl From<StringValue> for Message {
    fn from(value: StringValue) -> Self {
        Message::String(value)
    }
}

impl From<BytesValue> for Message {
    fn from(value: BytesValue) -> Self {
        Message::Bytes(value)
    }
}

impl From<MapValue> for Message {
    fn from(value: MapValue) -> Self {
        Message::StringMap(value)
    }
}

impl From<ThrowableProto> for Message {
    fn from(value: ThrowableProto) -> Self {
        Message::Throwable(value)
    }
}
