//! Schema-constrained JSON line serialization for RPC payloads.
//!
//! protoline writes RPC arguments, results, errors, keep-alive events and
//! call attachments as one self-describing JSON record per line, flushing
//! after every record.
//!
//! # Crate Structure
//!
//! - [`schema`]: Wrapper messages, the throwable message and the type registry
//! - [`frame`]: Newline-delimited record framing over any `Write` sink
//! - [`output`]: The typed object output used by RPC transports
//!
//! ```
//! use protoline::output::JsonObjectOutput;
//!
//! let mut out = JsonObjectOutput::new(Vec::new());
//! out.write_int(42).unwrap();
//! out.write_utf("ok").unwrap();
//! assert_eq!(out.into_inner(), b"42\n\"ok\"\n");
//! ```

/// Re-export schema types.
pub mod schema {
    pub use protoline_schema::*;
}

/// Re-export frame types.
pub mod frame {
    pub use protoline_frame::*;
}

/// Re-export output types.
pub mod output {
    pub use protoline_output::*;
}

pub use protoline_output::{JsonObjectOutput, OutputError};
