use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("amswire {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: amswire");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "build_target: {}",
        option_env!("AMSWIRE_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("default_port: {}", amswire_transport::DEFAULT_PORT);
    println!("max_frame_size: {}", amswire_codec::DEFAULT_MAX_FRAME_SIZE);

    Ok(SUCCESS)
}
