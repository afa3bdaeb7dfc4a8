use bytes::{BufMut, BytesMut};
use protoline_schema::{render_json, Message};

use crate::error::Result;

/// Default maximum record size: no limit.
pub const DEFAULT_MAX_RECORD_SIZE: usize = usize::MAX;

/// Line terminator appended after each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineTerminator {
    #[default]
    Lf,
    CrLf,
}

impl LineTerminator {
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            LineTerminator::Lf => b"\n",
            LineTerminator::CrLf => b"\r\n",
        }
    }
}

/// Encode a message into the record wire format.
///
/// Wire format:
/// ```text
/// ┌───────────────────────────────┬──────────────────┐
/// │ Compact JSON (UTF-8)          │ \n  (or \r\n)    │
/// └───────────────────────────────┴──────────────────┘
/// ```
///
/// Rendering happens before anything is appended, so on error `dst` is
/// left untouched.
pub fn encode_record(message: &Message, terminator: LineTerminator, dst: &mut BytesMut) -> Result<()> {
    let text = render_json(message)?;
    let terminator = terminator.as_bytes();
    dst.reserve(text.len() + terminator.len());
    dst.put_slice(text.as_bytes());
    dst.put_slice(terminator);
    Ok(())
}

/// Configuration for record framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordConfig {
    /// Maximum record size in bytes, terminator included. Default: no limit.
    pub max_record_size: usize,
    /// Terminator written after each record. Default: `\n`.
    pub line_terminator: LineTerminator,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            max_record_size: DEFAULT_MAX_RECORD_SIZE,
            line_terminator: LineTerminator::Lf,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use protoline_schema::{Int32Value, MapValue, StringValue};

    use super::*;

    #[test]
    fn test_encode_appends_single_terminator() {
        let mut buf = BytesMut::new();
        encode_record(&Int32Value::new(42).into(), LineTerminator::Lf, &mut buf).unwrap();
        assert_eq!(buf.as_ref(), b"42\n");
    }

    #[test]
    fn test_encode_crlf() {
        let mut buf = BytesMut::new();
        encode_record(&StringValue::new("ok").into(), LineTerminator::CrLf, &mut buf).unwrap();
        assert_eq!(buf.as_ref(), b"\"ok\"\r\n");
    }

    #[test]
    fn test_embedded_newlines_stay_escaped() {
        let mut attachments = BTreeMap::new();
        attachments.insert("multi\nline".to_string(), "a\r\nb".to_string());

        let mut buf = BytesMut::new();
        encode_record(&MapValue::new(attachments).into(), LineTerminator::Lf, &mut buf).unwrap();

        let line_breaks = buf.iter().filter(|b| **b == b'\n').count();
        assert_eq!(line_breaks, 1);
        assert!(buf.ends_with(b"\n"));
        assert!(!buf.contains(&b'\r'));
    }

    #[test]
    fn test_encode_appends_to_existing_buffer() {
        let mut buf = BytesMut::new();
        encode_record(&Int32Value::new(1).into(), LineTerminator::Lf, &mut buf).unwrap();
        encode_record(&Int32Value::new(2).into(), LineTerminator::Lf, &mut buf).unwrap();
        assert_eq!(buf.as_ref(), b"1\n2\n");
    }

    #[test]
    fn test_default_terminator_is_lf() {
        assert_eq!(LineTerminator::default(), LineTerminator::Lf);
        assert_eq!(RecordConfig::default().line_terminator.as_bytes(), b"\n");
        assert_eq!(RecordConfig::default().max_record_size, usize::MAX);
    }
}
