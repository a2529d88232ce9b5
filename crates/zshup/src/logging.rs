use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::{File, OpenOptions};
use std::path::Path;

/// Drops the older half of the log, cutting at a line boundary.
fn trim_log_file_if_oversized(log_path: &Path, max_log_size: u64) {
    let oversized = std::fs::metadata(log_path).is_ok_and(|meta| meta.len() > max_log_size);
    if !oversized {
        return;
    }
    let Ok(contents) = std::fs::read(log_path) else {
        return;
    };

    let midpoint = contents.len() / 2;
    let tail = &contents[midpoint..];
    let tail = match tail.iter().position(|&byte| byte == b'\n') {
        Some(newline) => &tail[newline + 1..],
        None => tail,
    };
    let _ = std::fs::write(log_path, tail);
}

fn open_log_file(log_path: &Path) -> std::io::Result<File> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(log_path)
}

fn terminal_level(debug_enabled: bool) -> LevelFilter {
    if debug_enabled {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Progress goes to the terminal; the log file always keeps debug detail.
pub fn init_logging(log_path: Option<&Path>, debug_enabled: bool, max_log_size: u64) {
    let term_config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .add_filter_allow_str("zshup")
        .build();

    let file_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("zshup")
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        terminal_level(debug_enabled),
        term_config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];

    let mut open_error = None;
    if let Some(log_path) = log_path {
        trim_log_file_if_oversized(log_path, max_log_size);
        match open_log_file(log_path) {
            Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Debug, file_config, file)),
            Err(error) => open_error = Some(error),
        }
    }

    let _ = CombinedLogger::init(loggers);

    if let Some(log_path) = log_path {
        match open_error {
            Some(error) => log::warn!(
                "Could not open log file {}: {error}",
                log_path.display()
            ),
            None => log::debug!("Logging to {}", log_path.display()),
        }
    }
}
