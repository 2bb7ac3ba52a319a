//! Main application entry point (native).

use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting Sketchpad");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [script, output] = args.as_slice() else {
        eprintln!("usage: sketchpad <session.json> <output.png>");
        return ExitCode::from(2);
    };

    match pollster::block_on(sketchpad_app::run(Path::new(script), Path::new(output))) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Session failed: {}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
