use std::any::type_name;
use std::error::Error;

use serde::Serialize;

/// Class name used for causes whose concrete type cannot be recovered.
pub const UNKNOWN_CAUSE_CLASS: &str = "std::error::Error";

/// One frame of a throwable's stack trace.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackTraceElement {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub class_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub method_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub file_name: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub line_number: i32,
}

/// Generic error representation used when an error type is not itself a
/// registered message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrowableProto {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub original_class_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub original_message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stack_trace: Vec<StackTraceElement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<ThrowableProto>>,
}

impl StackTraceElement {
    pub fn new(
        class_name: impl Into<String>,
        method_name: impl Into<String>,
        file_name: impl Into<String>,
        line_number: i32,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            file_name: file_name.into(),
            line_number,
        }
    }
}

impl ThrowableProto {
    pub fn new(class_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            original_class_name: class_name.into(),
            original_message: message.into(),
            stack_trace: Vec::new(),
            cause: None,
        }
    }

    /// Build from an error value, following its `source()` chain for at most
    /// `max_cause_depth` levels.
    ///
    /// The root carries the error's Rust type name. Causes are only known as
    /// `dyn Error`, so a handful of std error types are recognized by
    /// downcasting and the rest are named [`UNKNOWN_CAUSE_CLASS`].
    pub fn from_error<E: Error + 'static>(err: &E, max_cause_depth: usize) -> Self {
        let mut root = Self::new(type_name::<E>(), err.to_string());
        root.cause = err
            .source()
            .and_then(|source| cause_chain(source, max_cause_depth));
        root
    }

    /// Build from a type-erased error. The root is named the same way causes
    /// are, since its concrete type is gone.
    pub fn from_dyn_error(err: &(dyn Error + 'static), max_cause_depth: usize) -> Self {
        let mut root = Self::new(known_class_name(err), err.to_string());
        root.cause = err
            .source()
            .and_then(|source| cause_chain(source, max_cause_depth));
        root
    }

    pub fn with_stack_trace(mut self, frames: Vec<StackTraceElement>) -> Self {
        self.stack_trace = frames;
        self
    }

    pub fn with_cause(mut self, cause: ThrowableProto) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Iterate over nested causes, nearest first.
    pub fn causes(&self) -> impl Iterator<Item = &ThrowableProto> {
        std::iter::successors(self.cause.as_deref(), |cause| cause.cause.as_deref())
    }
}

fn cause_chain(err: &(dyn Error + 'static), remaining: usize) -> Option<Box<ThrowableProto>> {
    if remaining == 0 {
        return None;
    }

    let mut node = ThrowableProto::new(known_class_name(err), err.to_string());
    node.cause = err
        .source()
        .and_then(|source| cause_chain(source, remaining - 1));
    Some(Box::new(node))
}

fn known_class_name(err: &(dyn Error + 'static)) -> &'static str {
    if err.is::<std::io::Error>() {
        type_name::<std::io::Error>()
    } else if err.is::<std::num::ParseIntError>() {
        type_name::<std::num::ParseIntError>()
    } else if err.is::<std::num::ParseFloatError>() {
        type_name::<std::num::ParseFloatError>()
    } else if err.is::<std::str::Utf8Error>() {
        type_name::<std::str::Utf8Error>()
    } else if err.is::<std::string::FromUtf8Error>() {
        type_name::<std::string::FromUtf8Error>()
    } else if err.is::<serde_json::Error>() {
        type_name::<serde_json::Error>()
    } else {
        UNKNOWN_CAUSE_CLASS
    }
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}
