use crate::shared::constants;
use lazy_static::lazy_static;
use std::any::Any;
use std::backtrace::Backtrace;
use std::fs::OpenOptions;
use std::io::Write;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Clone)]
struct LoggerPaths {
    error_path: PathBuf,
    debug_path: PathBuf,
}

lazy_static! {
    static ref LOGGER: Mutex<Option<LoggerPaths>> = Mutex::new(None);
}

fn append_line(path: &Path, line: &str) {
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = writeln!(file, "{}", line);
    }
}

fn start_file(path: &Path, title: &str) {
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
    {
        let _ = writeln!(file, "=== {} Started: {} ===", title, chrono::Local::now());
    }
}

/// Truncates both log files in `dir` and installs the panic hook.
pub fn init(dir: &Path) {
    let error_path = dir.join(constants::ERROR_LOG_FILE);
    let debug_path = dir.join(constants::DEBUG_LOG_FILE);

    start_file(&error_path, "Error Log");
    start_file(&debug_path, "Debug Log");

    let paths = LoggerPaths {
        error_path,
        debug_path,
    };
    if let Ok(mut guard) = LOGGER.lock() {
        *guard = Some(paths.clone());
    }

    install_panic_hook(paths);
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Restores the terminal before reporting, since the display guard may not unwind.
fn install_panic_hook(paths: LoggerPaths) {
    panic::set_hook(Box::new(move |info| {
        crate::renderer::display::restore_terminal();

        let msg = panic_message(info.payload());
        let location = info
            .location()
            .map_or_else(|| "<unknown>".to_string(), |l| l.to_string());
        let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
        let report = format!(
            "[{}][PANIC] {} at {}\n{}",
            timestamp,
            msg,
            location,
            Backtrace::force_capture()
        );
        for path in [&paths.error_path, &paths.debug_path] {
            append_line(path, &report);
        }

        eprintln!(
            "{} crashed: {} ({}). See {} for details.",
            constants::APP_NAME,
            msg,
            location,
            paths.error_path.display()
        );
    }));
}

pub fn log(level: &str, msg: &str) {
    let paths = match LOGGER.lock() {
        Ok(guard) => guard.clone(),
        Err(_) => return,
    };
    if let Some(paths) = paths {
        let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
        let line = format!("[{}][{}] {}", timestamp, level, msg);
        append_line(&paths.debug_path, &line);

        if level == "ERROR" {
            append_line(&paths.error_path, &line);
        }
    }
}

pub fn info(msg: &str) {
    log("INFO", msg);
}

pub fn error(msg: &str) {
    log("ERROR", msg);
}

pub fn debug(msg: &str) {
    log("DEBUG", msg);
}
