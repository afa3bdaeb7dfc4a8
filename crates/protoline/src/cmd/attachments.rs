use std::collections::BTreeMap;

use crate::cmd::AttachmentsArgs;
use crate::exit::{output_error, CliError, CliResult, USAGE};
use crate::sink::CliOutput;

pub fn run(out: &mut CliOutput, args: &AttachmentsArgs) -> CliResult<()> {
    let attachments = parse_pairs(&args.pairs)?;
    out.write_attachments(Some(&attachments))
        .map_err(|err| output_error("write failed", err))
}

/// Parse KEY=VALUE pairs. Later duplicates replace earlier ones.
fn parse_pairs(pairs: &[String]) -> CliResult<BTreeMap<String, String>> {
    let mut attachments = BTreeMap::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(CliError::new(
                USAGE,
                format!("attachment must be KEY=VALUE: {pair}"),
            ));
        };
        if key.is_empty() {
            return Err(CliError::new(USAGE, format!("attachment key is empty: {pair}")));
        }
        attachments.insert(key.to_string(), value.to_string());
    }
    Ok(attachments)
}
