use std::any::{type_name, Any};
use std::error::Error;
use std::io::Write;
use std::sync::{Arc, OnceLock};

use bytes::Bytes;
use protoline_frame::{Event, RecordConfig, RecordWriter};
use protoline_schema::{
    BoolValue, BytesValue, DoubleValue, FloatValue, Int32Value, Int64Value, Message,
    MessageRegistry, StringValue, ThrowableProto,
};
use tracing::{debug, trace};

use crate::attachments::{project_attachments, AttachmentValue};
use crate::error::{OutputError, Result};
use crate::event::resolve_event;

fn default_registry() -> Arc<MessageRegistry> {
    static REGISTRY: OnceLock<Arc<MessageRegistry>> = OnceLock::new();
    Arc::clone(REGISTRY.get_or_init(|| Arc::new(MessageRegistry::new())))
}

/// Writes RPC payloads as newline-delimited JSON records.
///
/// One instance is bound to one outbound channel. Every successful write
/// call commits exactly one record and flushes the sink before returning;
/// the only exception is [`write_attachments`](Self::write_attachments)
/// with no entries, which writes nothing.
pub struct JsonObjectOutput<W> {
    writer: RecordWriter<W>,
    registry: Arc<MessageRegistry>,
}

impl<W: Write> JsonObjectOutput<W> {
    /// Create an output over `sink` with the default registry and framing.
    pub fn new(sink: W) -> Self {
        Self::with_config(sink, RecordConfig::default(), default_registry())
    }

    /// Create an output with explicit framing config and registry.
    pub fn with_config(sink: W, config: RecordConfig, registry: Arc<MessageRegistry>) -> Self {
        Self {
            writer: RecordWriter::with_config(sink, config),
            registry,
        }
    }

    pub fn write_bool(&mut self, v: bool) -> Result<()> {
        self.write_wrapper(BoolValue::new(v))
    }

    /// Widened to the int32 wrapper.
    pub fn write_byte(&mut self, v: i8) -> Result<()> {
        self.write_wrapper(Int32Value::new(i32::from(v)))
    }

    /// Widened to the int32 wrapper.
    pub fn write_short(&mut self, v: i16) -> Result<()> {
        self.write_wrapper(Int32Value::new(i32::from(v)))
    }

    pub fn write_int(&mut self, v: i32) -> Result<()> {
        self.write_wrapper(Int32Value::new(v))
    }

    pub fn write_long(&mut self, v: i64) -> Result<()> {
        self.write_wrapper(Int64Value::new(v))
    }

    pub fn write_float(&mut self, v: f32) -> Result<()> {
        self.write_wrapper(FloatValue::new(v))
    }

    pub fn write_double(&mut self, v: f64) -> Result<()> {
        self.write_wrapper(DoubleValue::new(v))
    }

    pub fn write_utf(&mut self, v: &str) -> Result<()> {
        self.write_wrapper(StringValue::new(v))
    }

    pub fn write_bytes(&mut self, b: &[u8]) -> Result<()> {
        self.write_wrapper(BytesValue::new(Bytes::copy_from_slice(b)))
    }

    /// Write exactly `b[off..off + len]` as a bytes wrapper.
    pub fn write_bytes_range(&mut self, b: &[u8], off: usize, len: usize) -> Result<()> {
        let value = BytesValue::copy_from_range(b, off, len).ok_or(OutputError::InvalidRange {
            offset: off,
            len,
            available: b.len(),
        })?;
        self.write_wrapper(value)
    }

    /// Write any registered message type.
    ///
    /// `None` fails with [`OutputError::NullPayload`]; an unregistered type
    /// fails with [`OutputError::UnsupportedPayload`] naming the type.
    pub fn write_object<T: Any>(&mut self, obj: Option<&T>) -> Result<()> {
        let Some(obj) = obj else {
            debug!("rejecting null payload");
            return Err(OutputError::NullPayload);
        };
        let message = self.registry.to_message(obj)?;
        self.registry.ensure_supported(&message)?;
        self.commit(&message)
    }

    /// Write an error outcome.
    ///
    /// Registered error types are written as they are. Anything else is
    /// normalized into the generic throwable message first. Boxed or
    /// borrowed trait objects go through
    /// [`write_dyn_throwable`](Self::write_dyn_throwable).
    pub fn write_throwable<E: Error + 'static>(&mut self, err: &E) -> Result<()> {
        if self.registry.is_supported::<E>() {
            return self.write_object(Some(err));
        }

        let throwable = self.registry.throwable_from_error(err);
        debug!(
            error_type = type_name::<E>(),
            "normalized unregistered error into throwable message"
        );
        self.write_object(Some(&throwable))
    }

    /// Write a type-erased error, such as a `Box<dyn Error + Send + Sync>`.
    ///
    /// The concrete type is unknown here, so the error is always normalized
    /// into the generic throwable message.
    pub fn write_dyn_throwable(&mut self, err: &(dyn Error + 'static)) -> Result<()> {
        let throwable = self.registry.throwable_from_dyn_error(err);
        self.write_object(Some(&throwable))
    }

    /// Write a prebuilt throwable message.
    pub fn write_throwable_message(&mut self, throwable: &ThrowableProto) -> Result<()> {
        self.write_object(Some(throwable))
    }

    /// Write an event; the heartbeat sentinel goes out as the mock value.
    pub fn write_event<'a>(&mut self, event: impl Into<Event<'a>>) -> Result<()> {
        let text = resolve_event(event.into())?;
        self.write_utf(text)
    }

    /// Write call attachments as one string map record.
    ///
    /// `None` or an empty map writes nothing. Every value must be a string;
    /// the first that is not fails the call before anything is written.
    pub fn write_attachments<'a, I, K, V>(&mut self, attachments: Option<I>) -> Result<()>
    where
        I: IntoIterator<Item = (&'a K, &'a V)>,
        K: AsRef<str> + ?Sized + 'a,
        V: AttachmentValue + ?Sized + 'a,
    {
        let Some(attachments) = attachments else {
            return Ok(());
        };

        let map = project_attachments(attachments)?;
        if map.is_empty() {
            trace!("skipping empty attachments");
            return Ok(());
        }
        self.write_wrapper(map)
    }

    /// Flush the sink without writing a record.
    pub fn flush_buffer(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Number of records committed so far.
    pub fn records_written(&self) -> u64 {
        self.writer.records_written()
    }

    pub fn registry(&self) -> &MessageRegistry {
        &self.registry
    }

    pub fn config(&self) -> &RecordConfig {
        self.writer.config()
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }

    /// Mutably borrow the underlying sink.
    pub fn get_mut(&mut self) -> &mut W {
        self.writer.get_mut()
    }

    /// Consume the output and return the inner sink.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_wrapper(&mut self, wrapper: impl Into<Message>) -> Result<()> {
        let message = wrapper.into();
        self.registry.ensure_supported(&message)?;
        self.commit(&message)
    }

    fn commit(&mut self, message: &Message) -> Result<()> {
        self.writer.write_message(message)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};
    use std::fmt;
    use std::io::{Cursor, ErrorKind};

    use protoline_frame::{FrameError, LineTerminator, HEARTBEAT_EVENT, MOCK_HEARTBEAT_EVENT};
    use protoline_schema::{DynamicMessage, MapValue};
    use serde::Serialize;

    use super::*;

    fn output() -> JsonObjectOutput<Cursor<Vec<u8>>> {
        JsonObjectOutput::new(Cursor::new(Vec::new()))
    }

    fn wire(out: JsonObjectOutput<Cursor<Vec<u8>>>) -> String {
        String::from_utf8(out.into_inner().into_inner()).unwrap()
    }

    fn records(out: JsonObjectOutput<Cursor<Vec<u8>>>) -> Vec<serde_json::Value> {
        wire(out)
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn single_record(write: impl FnOnce(&mut JsonObjectOutput<Cursor<Vec<u8>>>)) -> String {
        let mut out = output();
        write(&mut out);
        wire(out)
    }

    #[derive(Debug)]
    struct Timeout {
        millis: u64,
    }

    impl fmt::Display for Timeout {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "call timed out after {}ms", self.millis)
        }
    }

    impl Error for Timeout {}

    #[derive(Debug)]
    struct CallFailed {
        source: std::io::Error,
    }

    impl fmt::Display for CallFailed {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "remote call failed")
        }
    }

    impl Error for CallFailed {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.source)
        }
    }

    #[derive(Debug, Serialize)]
    struct RegisteredFault {
        code: u16,
    }

    impl fmt::Display for RegisteredFault {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "fault {}", self.code)
        }
    }

    impl Error for RegisteredFault {}

    struct NotAMessage;

    #[test]
    fn write_int_emits_one_line() {
        assert_eq!(single_record(|out| out.write_int(42).unwrap()), "42\n");
    }

    #[test]
    fn narrow_integers_widen_to_int32() {
        let mut out = output();
        out.write_byte(-8).unwrap();
        out.write_short(i16::MAX).unwrap();

        assert_eq!(wire(out), "-8\n32767\n");
    }

    #[test]
    fn scalars_round_trip() {
        let mut out = output();
        out.write_bool(true).unwrap();
        out.write_long(i64::MIN).unwrap();
        out.write_float(0.5).unwrap();
        out.write_double(-2.25).unwrap();
        out.write_utf("héllo").unwrap();
        out.write_bytes(b"\x00\xffdata").unwrap();

        let decoded = records(out);
        assert_eq!(decoded[0], serde_json::json!(true));
        assert_eq!(
            decoded[1].as_str().unwrap().parse::<i64>().unwrap(),
            i64::MIN
        );
        assert_eq!(decoded[2].as_f64().unwrap() as f32, 0.5f32);
        assert_eq!(decoded[3].as_f64().unwrap(), -2.25);
        assert_eq!(decoded[4], serde_json::json!("héllo"));
        assert_eq!(decoded[5], serde_json::json!("AP9kYXRh"));
    }

    #[test]
    fn bool_then_utf_are_two_ordered_records() {
        let mut out = output();
        out.write_bool(true).unwrap();
        out.write_utf("ok").unwrap();

        assert_eq!(out.records_written(), 2);
        assert_eq!(wire(out), "true\n\"ok\"\n");
    }

    #[test]
    fn large_bytes_write_succeeds_with_defaults() {
        let mut out = output();
        out.write_bytes(&vec![0u8; 13 * 1024 * 1024]).unwrap();

        assert_eq!(out.records_written(), 1);
        assert!(wire(out).len() > 16 * 1024 * 1024);
    }

    #[test]
    fn bytes_range_ignores_bytes_outside_window() {
        let first = single_record(|out| out.write_bytes_range(b"AAhiBB", 2, 2).unwrap());
        let second = single_record(|out| out.write_bytes_range(b"zzhiyy", 2, 2).unwrap());
        let whole = single_record(|out| out.write_bytes(b"hi").unwrap());

        assert_eq!(first, second);
        assert_eq!(first, whole);
    }

    #[test]
    fn bytes_range_out_of_bounds_writes_nothing() {
        let mut out = output();
        let err = out.write_bytes_range(b"abc", 2, 5).unwrap_err();

        assert!(matches!(
            err,
            OutputError::InvalidRange {
                offset: 2,
                len: 5,
                available: 3
            }
        ));
        assert!(wire(out).is_empty());
    }

    #[test]
    fn write_object_rejects_null() {
        let mut out = output();
        let err = out.write_object::<Int32Value>(None).unwrap_err();

        assert!(matches!(err, OutputError::NullPayload));
        assert!(err.to_string().ends_with("null"));
        assert!(wire(out).is_empty());
    }

    #[test]
    fn write_object_rejects_unregistered_type() {
        let mut out = output();
        let err = out.write_object(Some(&NotAMessage)).unwrap_err();

        match err {
            OutputError::UnsupportedPayload { type_name } => {
                assert!(type_name.ends_with("NotAMessage"))
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(out.records_written(), 0);
    }

    #[test]
    fn message_variants_are_guarded_by_registry() {
        let mut registry = MessageRegistry::empty();
        registry.register::<Message>();
        registry.register::<StringValue>();
        let mut out = JsonObjectOutput::with_config(
            Cursor::new(Vec::new()),
            RecordConfig::default(),
            Arc::new(registry),
        );

        assert!(matches!(
            out.write_int(1).unwrap_err(),
            OutputError::UnsupportedPayload { .. }
        ));
        assert!(matches!(
            out.write_object(Some(&Message::from(Int32Value::new(1))))
                .unwrap_err(),
            OutputError::UnsupportedPayload { .. }
        ));
        out.write_object(Some(&Message::from(StringValue::new("s"))))
            .unwrap();

        assert_eq!(wire(out), "\"s\"\n");
    }

    #[test]
    fn unregistered_dynamic_message_is_rejected() {
        let message = Message::Dynamic(DynamicMessage {
            type_id: std::any::TypeId::of::<NotAMessage>(),
            type_name: "not.Registered",
            body: serde_json::json!({ "x": 1 }),
        });

        let mut out = output();
        let err = out.write_object(Some(&message)).unwrap_err();

        match err {
            OutputError::UnsupportedPayload { type_name } => assert_eq!(type_name, "not.Registered"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(wire(out).is_empty());
    }

    #[test]
    fn write_object_accepts_wrappers_and_messages() {
        let mut out = output();
        out.write_object(Some(&Int32Value::new(42))).unwrap();
        out.write_object(Some(&Message::from(StringValue::new("m"))))
            .unwrap();

        assert_eq!(wire(out), "42\n\"m\"\n");
    }

    #[test]
    fn unregistered_error_becomes_throwable_record() {
        let mut out = output();
        out.write_throwable(&Timeout { millis: 250 }).unwrap();

        let decoded = records(out);
        assert_eq!(decoded.len(), 1);
        assert!(decoded[0]["originalClassName"]
            .as_str()
            .unwrap()
            .ends_with("Timeout"));
        assert_eq!(
            decoded[0]["originalMessage"],
            serde_json::json!("call timed out after 250ms")
        );
    }

    #[test]
    fn cause_chain_is_carried() {
        let mut out = output();
        let err = CallFailed {
            source: std::io::Error::new(ErrorKind::ConnectionReset, "connection reset"),
        };
        out.write_throwable(&err).unwrap();

        let decoded = records(out);
        assert_eq!(decoded[0]["originalMessage"], serde_json::json!("remote call failed"));
        assert_eq!(
            decoded[0]["cause"]["originalClassName"],
            serde_json::json!(type_name::<std::io::Error>())
        );
        assert_eq!(
            decoded[0]["cause"]["originalMessage"],
            serde_json::json!("connection reset")
        );
    }

    #[test]
    fn boxed_error_becomes_throwable_record() {
        let err: Box<dyn Error + Send + Sync> = Box::new(CallFailed {
            source: std::io::Error::new(ErrorKind::ConnectionReset, "connection reset"),
        });

        let mut out = output();
        out.write_dyn_throwable(err.as_ref()).unwrap();

        let decoded = records(out);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0]["originalClassName"], serde_json::json!("std::error::Error"));
        assert_eq!(decoded[0]["originalMessage"], serde_json::json!("remote call failed"));
        assert_eq!(
            decoded[0]["cause"]["originalMessage"],
            serde_json::json!("connection reset")
        );

        let plain: Box<dyn Error + Send + Sync> = "boom".into();
        let record = single_record(|out| out.write_dyn_throwable(plain.as_ref()).unwrap());
        assert_eq!(
            record,
            "{\"originalClassName\":\"std::error::Error\",\"originalMessage\":\"boom\"}\n"
        );
    }

    #[test]
    fn registered_error_matches_write_object() {
        let mut registry = MessageRegistry::new();
        registry.register_serde::<RegisteredFault>("demo.RegisteredFault");
        let registry = Arc::new(registry);

        let fault = RegisteredFault { code: 503 };

        let mut via_throwable = JsonObjectOutput::with_config(
            Cursor::new(Vec::new()),
            RecordConfig::default(),
            Arc::clone(&registry),
        );
        via_throwable.write_throwable(&fault).unwrap();

        let mut via_object =
            JsonObjectOutput::with_config(Cursor::new(Vec::new()), RecordConfig::default(), registry);
        via_object.write_object(Some(&fault)).unwrap();

        assert_eq!(wire(via_throwable), "{\"code\":503}\n");
        assert_eq!(wire(via_object), "{\"code\":503}\n");
    }

    #[test]
    fn prebuilt_throwable_passes_through() {
        let proto = ThrowableProto::new("demo.Failure", "boom");
        let from_object = single_record(|out| out.write_object(Some(&proto)).unwrap());
        let from_message = single_record(|out| out.write_throwable_message(&proto).unwrap());
        assert_eq!(
            from_object,
            "{\"originalClassName\":\"demo.Failure\",\"originalMessage\":\"boom\"}\n"
        );
        assert_eq!(from_object, from_message);
    }

    #[test]
    fn throwable_unsupported_when_registry_lacks_it() {
        let mut registry = MessageRegistry::empty();
        registry.register::<StringValue>();
        let mut out = JsonObjectOutput::with_config(
            Cursor::new(Vec::new()),
            RecordConfig::default(),
            Arc::new(registry),
        );

        let err = out.write_throwable(&Timeout { millis: 1 }).unwrap_err();
        match err {
            OutputError::UnsupportedPayload { type_name } => {
                assert!(type_name.ends_with("ThrowableProto"))
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = out.write_int(1).unwrap_err();
        assert!(matches!(err, OutputError::UnsupportedPayload { .. }));
        assert!(out.write_utf("still fine").is_ok());
    }

    #[test]
    fn heartbeat_event_writes_mock_value() {
        let heartbeat = single_record(|out| out.write_event(HEARTBEAT_EVENT).unwrap());
        let classified =
            single_record(|out| out.write_event(Event::payload(&HEARTBEAT_EVENT)).unwrap());
        let mock = single_record(|out| out.write_utf(MOCK_HEARTBEAT_EVENT).unwrap());

        assert_eq!(heartbeat, mock);
        assert_eq!(classified, mock);
    }

    #[test]
    fn text_event_matches_write_utf() {
        let event = single_record(|out| out.write_event("READONLY").unwrap());
        let text = single_record(|out| out.write_utf("READONLY").unwrap());
        assert_eq!(event, text);

        let owned = String::from("R");
        assert_eq!(
            single_record(|out| out.write_event(&owned).unwrap()),
            "\"R\"\n"
        );
    }

    #[test]
    fn non_string_event_fails_without_output() {
        let mut out = output();
        let err = out.write_event(Event::payload(&7i64)).unwrap_err();

        assert!(err.is_type_cast());
        assert!(wire(out).is_empty());
    }

    #[test]
    fn absent_and_empty_attachments_write_nothing() {
        let mut out = output();
        out.write_attachments(None::<&HashMap<String, String>>)
            .unwrap();
        out.write_attachments(Some(&HashMap::<String, String>::new()))
            .unwrap();

        assert_eq!(out.records_written(), 0);
        assert!(wire(out).is_empty());
    }

    #[test]
    fn attachments_write_one_string_map_record() {
        let mut attachments = HashMap::new();
        attachments.insert("k".to_string(), "v".to_string());

        let mut out = output();
        out.write_attachments(Some(&attachments)).unwrap();

        assert_eq!(out.records_written(), 1);
        assert_eq!(wire(out), "{\"attachments\":{\"k\":\"v\"}}\n");
    }

    #[test]
    fn attachments_match_string_map_object() {
        let mut attachments = BTreeMap::new();
        attachments.insert("b".to_string(), "2".to_string());
        attachments.insert("a".to_string(), "1".to_string());

        let direct = single_record(|out| out.write_attachments(Some(&attachments)).unwrap());
        let as_object = single_record(|out| {
            out.write_object(Some(&MapValue::new(attachments.clone())))
                .unwrap()
        });
        assert_eq!(direct, as_object);
    }

    #[test]
    fn non_string_attachment_writes_nothing() {
        let mut attachments: HashMap<String, Box<dyn Any>> = HashMap::new();
        attachments.insert("retries".to_string(), Box::new(3i32));

        let mut out = output();
        let err = out.write_attachments(Some(&attachments)).unwrap_err();

        assert!(matches!(err, OutputError::AttachmentType { ref key, .. } if key == "retries"));
        assert!(wire(out).is_empty());
    }

    #[test]
    fn flush_buffer_is_idempotent() {
        let mut out = output();
        out.flush_buffer().unwrap();
        out.flush_buffer().unwrap();

        assert_eq!(out.records_written(), 0);
        assert!(wire(out).is_empty());
    }

    #[test]
    fn crlf_config_is_honoured() {
        let config = RecordConfig {
            line_terminator: LineTerminator::CrLf,
            ..RecordConfig::default()
        };
        let mut out = JsonObjectOutput::with_config(
            Cursor::new(Vec::new()),
            config,
            Arc::new(MessageRegistry::new()),
        );
        out.write_int(1).unwrap();

        assert_eq!(out.config().line_terminator, LineTerminator::CrLf);
        assert_eq!(wire(out), "1\r\n");
    }

    #[test]
    fn sink_errors_surface_as_io() {
        let mut out = JsonObjectOutput::new(FailingSink);
        let err = out.write_int(1).unwrap_err();

        assert!(matches!(err, OutputError::Frame(FrameError::Io(_))));
        assert!(matches!(
            out.flush_buffer().unwrap_err(),
            OutputError::Frame(FrameError::Io(_))
        ));
    }

    #[test]
    fn every_write_is_flushed_before_returning() {
        let mut out = JsonObjectOutput::new(RecordingSink::default());
        out.write_int(1).unwrap();
        out.write_utf("two").unwrap();
        out.write_event(HEARTBEAT_EVENT).unwrap();

        let flushed = &out.get_ref().flushed;
        assert_eq!(
            flushed,
            &vec![
                b"1\n".to_vec(),
                b"1\n\"two\"\n".to_vec(),
                b"1\n\"two\"\n\"H\"\n".to_vec(),
            ]
        );
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::from(ErrorKind::BrokenPipe))
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        data: Vec<u8>,
        flushed: Vec<Vec<u8>>,
    }

    impl Write for RecordingSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed.push(self.data.clone());
            Ok(())
        }
    }
}
