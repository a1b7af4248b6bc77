use chrono::Local;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::Path,
    sync::{Arc, Mutex},
};

pub trait Logger: Send + Sync {
    fn log(&mut self, message: &str);
    fn debug_log(&mut self, message: &str);
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[derive(Debug)]
pub struct FileLogger {
    log_file: String,
    debug: bool,
}

impl FileLogger {
    pub fn new(log_file: &str, debug: bool) -> std::io::Result<Self> {
        // Create log directory if it doesn't exist
        if let Some(parent) = Path::new(log_file).parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(FileLogger {
            log_file: log_file.to_string(),
            debug,
        })
    }

    fn write_to_file(&self, message: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)?;

        writeln!(file, "{}: {}", timestamp(), message)
    }
}

impl Logger for FileLogger {
    fn log(&mut self, message: &str) {
        if let Err(e) = self.write_to_file(message) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    fn debug_log(&mut self, message: &str) {
        if self.debug {
            if let Err(e) = self.write_to_file(&format!("[DEBUG] {}", message)) {
                eprintln!("Failed to write debug log: {}", e);
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct StderrLogger {
    debug: bool,
}

impl StderrLogger {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }
}

impl Logger for StderrLogger {
    fn log(&mut self, message: &str) {
        eprintln!("{}: {}", timestamp(), message);
    }

    fn debug_log(&mut self, message: &str) {
        if self.debug {
            eprintln!("{}: [DEBUG] {}", timestamp(), message);
        }
    }
}

/// Keeps log lines in memory. Clones share the same buffer, so a handle can
/// be kept after the logger itself is boxed away.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogger {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    fn push(&self, line: String) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line);
        }
    }
}

impl Logger for MemoryLogger {
    fn log(&mut self, message: &str) {
        self.push(message.to_string());
    }

    fn debug_log(&mut self, message: &str) {
        self.push(format!("[DEBUG] {}", message));
    }
}

// MultiLogger allows logging to multiple destinations
#[derive(Default)]
pub struct MultiLogger {
    loggers: Vec<Box<dyn Logger>>,
}

impl MultiLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, logger: Box<dyn Logger>) -> Self {
        self.loggers.push(logger);
        self
    }
}

impl Logger for MultiLogger {
    fn log(&mut self, message: &str) {
        for logger in &mut self.loggers {
            logger.log(message);
        }
    }

    fn debug_log(&mut self, message: &str) {
        for logger in &mut self.loggers {
            logger.debug_log(message);
        }
    }
}
