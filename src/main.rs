mod app;
mod config;
mod effects;
mod error;
mod layout;
mod loader;
mod quiz;
mod sampler;
mod session;
mod ui;

use std::fs::File;
use std::path::PathBuf;

use app::QuizApp;
use config::UserConfig;
use eframe::egui;
use simplelog::{ColorChoice, CombinedLogger, SharedLogger, TermLogger, TerminalMode, WriteLogger};

fn init_logging(config: &UserConfig) {
    let level = config.log_filter();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        level,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ));
    if let Some(path) = &config.log_file {
        match File::create(path) {
            Ok(file) => loggers.push(WriteLogger::new(level, simplelog::Config::default(), file)),
            Err(e) => eprintln!("Cannot open log file {}: {}", path.display(), e),
        }
    }
    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("Logger setup failed: {}", e);
    }
}

fn main() -> Result<(), eframe::Error> {
    let (config, config_error) = match UserConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (UserConfig::default(), Some(e)),
    };
    init_logging(&config);
    if let Some(e) = config_error {
        log::warn!("Ignoring unreadable config {}: {}", UserConfig::path().display(), e);
    }

    let bank_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.questions_path.clone());
    log::info!("Config at {}", UserConfig::path().display());

    let options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(800.0, 600.0)),
        ..Default::default()
    };

    eframe::run_native(
        "Quiz Canvas",
        options,
        Box::new(move |cc| Box::new(QuizApp::new(cc, config, bank_path))),
    )
}
