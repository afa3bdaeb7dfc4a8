use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use protoline_frame::{LineTerminator, RecordConfig, DEFAULT_MAX_RECORD_SIZE};
use protoline_output::{JsonObjectOutput, MessageRegistry};

use crate::cmd::SinkArgs;
use crate::exit::{io_error, CliResult};

pub type CliOutput = JsonObjectOutput<Box<dyn Write>>;

/// Build the object output described by the global sink flags.
pub fn open_output(args: &SinkArgs) -> CliResult<CliOutput> {
    let config = RecordConfig {
        max_record_size: args.max_record_size.unwrap_or(DEFAULT_MAX_RECORD_SIZE),
        line_terminator: if args.crlf {
            LineTerminator::CrLf
        } else {
            LineTerminator::Lf
        },
    };
    let sink = open_sink(args.out.as_deref(), args.append)?;
    Ok(JsonObjectOutput::with_config(
        sink,
        config,
        Arc::new(MessageRegistry::new()),
    ))
}

/// Where records go: stdout, or a file opened for append or truncate.
fn open_sink(path: Option<&Path>, append: bool) -> CliResult<Box<dyn Write>> {
    let Some(path) = path else {
        return Ok(Box::new(io::stdout().lock()));
    };

    let file = open_file(path, append)
        .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
    tracing::debug!(path = %path.display(), append, "writing records to file");
    Ok(Box::new(file))
}

fn open_file(path: &Path, append: bool) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    options.open(path)
}
