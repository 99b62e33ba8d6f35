use colored_square::{config::CONFIG_FILE, render::scene, AppConfig, Host};
use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;
use std::process::ExitCode;

/// Window or context creation failed.
const EXIT_HOST_FAILURE: u8 = 255;

fn main() -> ExitCode {
    let config = AppConfig::load_or_default(CONFIG_FILE);
    let level = config
        .as_ref()
        .map(|c| c.log_level)
        .unwrap_or(LevelFilter::Info);
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("Failed to initialise logger: {}", e);
    }

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Initializing application...");
    let (host, event_loop) = match Host::new(&config.window) {
        Ok(host) => host,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(EXIT_HOST_FAILURE);
        }
    };

    let scene = scene::prepare(host.device(), &config.shader);
    if !scene.build.is_clean() {
        error!(
            "Shader program built with {} error(s); the quad may not render",
            scene.build.errors.len()
        );
    }

    match host.run(event_loop, scene.pipeline) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
