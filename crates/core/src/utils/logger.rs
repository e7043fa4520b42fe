use std::fmt::Display;

use chrono::Local;

#[derive(Clone, Copy)]
enum Level {
    Info,
    Debug,
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Error => "ERROR",
        }
    }

    fn prefix(self) -> &'static str {
        // Single-letter markers for the compact format
        match self {
            Level::Info => "",
            Level::Debug => "d",
            Level::Error => "e",
        }
    }
}

pub struct Logger {
    service: &'static str,
    compact: bool,
}

impl Logger {
    pub const fn verbose(service: &'static str) -> Self {
        Self {
            service,
            compact: false,
        }
    }
    pub const fn compact(service: &'static str) -> Self {
        Self {
            service,
            compact: true,
        }
    }

    fn create_message(&self, level: Level, msg: impl Display) -> String {
        if self.compact {
            format!("{}[{}] {}", level.prefix(), self.service, msg)
        } else {
            format!(
                "[{}] {} {}: {}",
                self.service,
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                level.as_str(),
                msg
            )
        }
    }

    pub fn info(&self, msg: impl Display) {
        println!("{}", self.create_message(Level::Info, msg));
    }
    pub fn debug(&self, msg: impl Display) {
        println!("{}", self.create_message(Level::Debug, msg));
    }
    pub fn error(&self, error: impl Display) {
        println!("{}", self.create_message(Level::Error, error));
    }
}
