use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::exit::{CliResult, SUCCESS};
use crate::sink::open_output;

pub mod attachments;
pub mod bytes;
pub mod event;
pub mod scalar;
pub mod throwable;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write bool records.
    Bool(BoolArgs),
    /// Write int32 records (byte and short widths are range-checked, then widened).
    Int(IntArgs),
    /// Write int64 records.
    Long(LongArgs),
    /// Write float records.
    Float(FloatArgs),
    /// Write double records.
    Double(DoubleArgs),
    /// Write UTF-8 string records.
    Utf(UtfArgs),
    /// Write one bytes record.
    Bytes(BytesArgs),
    /// Write one event record (heartbeats go out as the mock value).
    Event(EventArgs),
    /// Write one attachments record from KEY=VALUE pairs.
    Attachments(AttachmentsArgs),
    /// Write one generic throwable record.
    Throwable(ThrowableArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, sink: &SinkArgs) -> CliResult<i32> {
    if let Command::Version(args) = &command {
        return version::run(args);
    }

    let mut out = open_output(sink)?;
    match command {
        Command::Bool(args) => scalar::write_bools(&mut out, &args)?,
        Command::Int(args) => scalar::write_ints(&mut out, &args)?,
        Command::Long(args) => scalar::write_longs(&mut out, &args)?,
        Command::Float(args) => scalar::write_floats(&mut out, &args)?,
        Command::Double(args) => scalar::write_doubles(&mut out, &args)?,
        Command::Utf(args) => scalar::write_utfs(&mut out, &args)?,
        Command::Bytes(args) => bytes::run(&mut out, &args)?,
        Command::Event(args) => event::run(&mut out, &args)?,
        Command::Attachments(args) => attachments::run(&mut out, &args)?,
        Command::Throwable(args) => throwable::run(&mut out, &args)?,
        Command::Version(_) => {}
    }

    tracing::debug!(records = out.records_written(), "done");
    Ok(SUCCESS)
}

#[derive(Args, Debug)]
pub struct SinkArgs {
    /// Write records to FILE instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", global = true)]
    pub out: Option<PathBuf>,
    /// Append to --out instead of truncating it.
    #[arg(long, global = true)]
    pub append: bool,
    /// Terminate records with CRLF instead of LF.
    #[arg(long, global = true)]
    pub crlf: bool,
    /// Reject records larger than BYTES, terminator included. No limit by default.
    #[arg(long, value_name = "BYTES", global = true)]
    pub max_record_size: Option<usize>,
}

#[derive(Args, Debug)]
pub struct BoolArgs {
    /// Values to write, one record each.
    #[arg(required = true)]
    pub values: Vec<bool>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum IntWidth {
    Byte,
    Short,
    Int,
}

#[derive(Args, Debug)]
pub struct IntArgs {
    /// Values to write, one record each.
    #[arg(required = true, allow_negative_numbers = true)]
    pub values: Vec<i32>,
    /// Source width of the values.
    #[arg(long, value_enum, default_value = "int")]
    pub width: IntWidth,
}

#[derive(Args, Debug)]
pub struct LongArgs {
    /// Values to write, one record each.
    #[arg(required = true, allow_negative_numbers = true)]
    pub values: Vec<i64>,
}

#[derive(Args, Debug)]
pub struct FloatArgs {
    /// Values to write, one record each.
    #[arg(required = true, allow_negative_numbers = true)]
    pub values: Vec<f32>,
}

#[derive(Args, Debug)]
pub struct DoubleArgs {
    /// Values to write, one record each.
    #[arg(required = true, allow_negative_numbers = true)]
    pub values: Vec<f64>,
}

#[derive(Args, Debug)]
pub struct UtfArgs {
    /// Strings to write, one record each.
    #[arg(required = true)]
    pub values: Vec<String>,
}

#[derive(Args, Debug)]
pub struct BytesArgs {
    /// Raw UTF-8 text payload.
    #[arg(long, conflicts_with_all = ["base64", "file"])]
    pub text: Option<String>,
    /// Base64 payload.
    #[arg(long, conflicts_with_all = ["text", "file"])]
    pub base64: Option<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with_all = ["text", "base64"])]
    pub file: Option<PathBuf>,
    /// Start of the window to write.
    #[arg(long)]
    pub offset: Option<usize>,
    /// Length of the window to write. Defaults to the rest of the payload.
    #[arg(long)]
    pub len: Option<usize>,
}

#[derive(Args, Debug)]
pub struct EventArgs {
    /// Event text.
    #[arg(conflicts_with = "heartbeat", required_unless_present = "heartbeat")]
    pub text: Option<String>,
    /// Send the keep-alive heartbeat.
    #[arg(long)]
    pub heartbeat: bool,
}

#[derive(Args, Debug)]
pub struct AttachmentsArgs {
    /// Attachments as KEY=VALUE. No pairs writes nothing.
    pub pairs: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ThrowableArgs {
    /// Class name of the error.
    #[arg(long = "class")]
    pub class_name: String,
    /// Error message.
    #[arg(long, default_value = "")]
    pub message: String,
    /// Nested cause as CLASS:MESSAGE, nearest first. Repeatable.
    #[arg(long = "cause", value_name = "CLASS:MESSAGE")]
    pub causes: Vec<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Include build and feature details.
    #[arg(long)]
    pub extended: bool,
}
