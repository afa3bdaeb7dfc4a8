use std::fs;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::cmd::BytesArgs;
use crate::exit::{io_error, output_error, CliError, CliResult, USAGE};
use crate::sink::CliOutput;

pub fn run(out: &mut CliOutput, args: &BytesArgs) -> CliResult<()> {
    let payload = resolve_payload(args)?;

    let result = match (args.offset, args.len) {
        (None, None) => out.write_bytes(&payload),
        (offset, len) => {
            let offset = offset.unwrap_or(0);
            let len = len.unwrap_or_else(|| payload.len().saturating_sub(offset));
            out.write_bytes_range(&payload, offset, len)
        }
    };
    result.map_err(|err| output_error("write failed", err))
}

fn resolve_payload(args: &BytesArgs) -> CliResult<Vec<u8>> {
    if let Some(text) = &args.text {
        return Ok(text.as_bytes().to_vec());
    }
    if let Some(encoded) = &args.base64 {
        return STANDARD
            .decode(encoded.trim())
            .map_err(|err| CliError::new(USAGE, format!("--base64 is not valid base64: {err}")));
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    Ok(Vec::new())
}
