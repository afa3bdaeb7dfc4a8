use protoline_schema::ThrowableProto;

use crate::cmd::ThrowableArgs;
use crate::exit::{output_error, CliResult};
use crate::sink::CliOutput;

pub fn run(out: &mut CliOutput, args: &ThrowableArgs) -> CliResult<()> {
    let throwable = build_throwable(args);
    out.write_throwable_message(&throwable)
        .map_err(|err| output_error("write failed", err))
}

fn build_throwable(args: &ThrowableArgs) -> ThrowableProto {
    let cause = args
        .causes
        .iter()
        .rev()
        .fold(None, |inner: Option<ThrowableProto>, entry| {
            let (class_name, message) = entry.split_once(':').unwrap_or((entry.as_str(), ""));
            let node = ThrowableProto::new(class_name, message);
            Some(match inner {
                Some(inner) => node.with_cause(inner),
                None => node,
            })
        });

    let root = ThrowableProto::new(args.class_name.as_str(), args.message.as_str());
    match cause {
        Some(cause) => root.with_cause(cause),
        None => root,
    }
}
