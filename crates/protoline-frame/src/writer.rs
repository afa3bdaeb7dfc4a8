use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use protoline_schema::Message;
use tracing::trace;

use crate::codec::{encode_record, RecordConfig};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes complete, flushed records to any `Write` sink.
pub struct RecordWriter<T> {
    inner: T,
    buf: BytesMut,
    config: RecordConfig,
    records_written: u64,
}

impl<T: Write> RecordWriter<T> {
    /// Create a new record writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, RecordConfig::default())
    }

    /// Create a new record writer with explicit configuration.
    pub fn with_config(inner: T, config: RecordConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
            records_written: 0,
        }
    }

    /// Render a message, write it as one record, and flush (blocking).
    ///
    /// Nothing reaches the sink if rendering fails or the record is too large.
    pub fn write_message(&mut self, message: &Message) -> Result<()> {
        self.buf.clear();
        encode_record(message, self.config.line_terminator, &mut self.buf)?;

        if self.buf.len() > self.config.max_record_size {
            return Err(FrameError::RecordTooLarge {
                size: self.buf.len(),
                max: self.config.max_record_size,
            });
        }

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()?;
        self.records_written += 1;
        trace!(
            message_type = message.type_name(),
            size = self.buf.len(),
            "record committed"
        );
        Ok(())
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Number of records committed so far.
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying sink.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner sink.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum record size for subsequent writes.
    pub fn set_max_record_size(&mut self, max_record_size: usize) {
        self.config.max_record_size = max_record_size;
    }

    /// Current record writer configuration.
    pub fn config(&self) -> &RecordConfig {
        &self.config
    }
}
