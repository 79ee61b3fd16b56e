//! Stderr logger for the `log` facade with coloured level tags.

use ansi_term::Colour::{Blue, Green, Purple, Red, Yellow};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

pub struct Logger {
    level: LevelFilter,
}

impl Logger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }
}

/// Install a [`Logger`] as the global logger. Fails if one is already set.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(Box::leak(Box::new(Logger::new(level))))?;
    log::set_max_level(level);
    Ok(())
}

fn tag(level: Level) -> String {
    match level {
        Level::Error => Red.bold().paint("ERROR").to_string(),
        Level::Warn => Yellow.bold().paint("WARN ").to_string(),
        Level::Info => Green.bold().paint("INFO ").to_string(),
        Level::Debug => Blue.paint("DEBUG").to_string(),
        Level::Trace => Purple.paint("TRACE").to_string(),
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // instruction traces are already column-aligned; keep them bare
        if record.level() == Level::Trace {
            eprintln!("{}", record.args());
        } else {
            eprintln!("{} {}: {}", tag(record.level()), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_by_level() {
        let logger = Logger::new(LevelFilter::Warn);
        let warn = Metadata::builder().level(Level::Warn).target("kestrel").build();
        let info = Metadata::builder().level(Level::Info).target("kestrel").build();

        assert!(logger.enabled(&warn));
        assert!(!logger.enabled(&info));
        assert!(!Logger::new(LevelFilter::Off).enabled(&warn));
    }

    #[test]
    fn tags_name_the_level() {
        assert!(tag(Level::Error).contains("ERROR"));
        assert!(tag(Level::Info).contains("INFO"));
        assert!(tag(Level::Trace).contains("TRACE"));
    }
}
