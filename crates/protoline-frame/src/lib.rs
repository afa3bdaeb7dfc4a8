//! Newline-delimited JSON record framing with flush-per-record semantics.
//!
//! Every message becomes exactly one record:
//! - The compact JSON rendering of the message (never contains a raw line break)
//! - One line terminator (`\n` by default)
//!
//! The record is written in full and the sink is flushed before the write
//! call returns, so readers can split the stream on line breaks.

pub mod codec;
pub mod error;
pub mod event;
pub mod writer;

pub use codec::{encode_record, LineTerminator, RecordConfig, DEFAULT_MAX_RECORD_SIZE};
pub use error::{FrameError, Result};
pub use event::{Event, HEARTBEAT_EVENT, MOCK_HEARTBEAT_EVENT};
pub use writer::RecordWriter;
