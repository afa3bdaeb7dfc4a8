use protoline_frame::{Event, HEARTBEAT_EVENT};

use crate::cmd::EventArgs;
use crate::exit::{output_error, CliResult};
use crate::sink::CliOutput;

pub fn run(out: &mut CliOutput, args: &EventArgs) -> CliResult<()> {
    let event = match (&args.text, args.heartbeat) {
        (_, true) => HEARTBEAT_EVENT,
        (Some(text), false) => Event::Text(text),
        (None, false) => Event::Text(""),
    };
    out.write_event(event)
        .map_err(|err| output_error("write failed", err))
}
