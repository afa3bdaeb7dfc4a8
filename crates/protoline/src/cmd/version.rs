use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: &VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("protoline {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: protoline");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("mock_heartbeat: {}", protoline_frame::MOCK_HEARTBEAT_EVENT);

    Ok(SUCCESS)
}
