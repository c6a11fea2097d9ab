// src/utils/logging.rs
//! Explicit logging sink handed to each component at construction.
//!
//! Components never call the `log` macros directly; they log through the
//! [`Logger`] they were built with. By default that handle forwards to whatever
//! logger is installed for the `log` facade (see [`init_env_logger`]), but a
//! caller can inject any [`log::Log`] implementation instead.

use log::{Level, Log, Metadata, Record};
use std::fmt;
use std::sync::Arc;

const DEFAULT_TARGET: &str = "ocean_sdk";

/// Forwards every record to the process-wide `log` logger.
struct GlobalSink;

impl Log for GlobalSink {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        log::logger().enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        log::logger().log(record)
    }

    fn flush(&self) {
        log::logger().flush()
    }
}

/// Cloneable handle to a logging sink.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn Log>,
    target: &'static str,
}

impl Logger {
    /// Wraps an arbitrary sink.
    pub fn new(sink: Arc<dyn Log>) -> Self {
        Self { sink, target: DEFAULT_TARGET }
    }

    /// Handle that forwards to the installed `log` logger.
    pub fn global() -> Self {
        Self::new(Arc::new(GlobalSink))
    }

    /// Returns a handle tagging its records with `target`.
    pub fn with_target(&self, target: &'static str) -> Self {
        Self { sink: self.sink.clone(), target }
    }

    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        let metadata = Metadata::builder().level(level).target(self.target).build();
        if !self.sink.enabled(&metadata) {
            return;
        }
        self.sink.log(
            &Record::builder()
                .metadata(metadata)
                .args(args)
                .build(),
        );
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args)
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args)
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args)
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::global()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("target", &self.target).finish()
    }
}

/// Installs `env_logger` as the `log` backend, honouring `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_env_logger() {
    let _ = env_logger::Builder::from_default_env().try_init();
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Sink that keeps every record in memory.
    #[derive(Default)]
    pub struct CaptureSink {
        pub records: Mutex<Vec<(Level, String, String)>>,
    }

    impl Log for CaptureSink {
        fn enabled(&self, _: &Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &Record<'_>) {
            self.records.lock().unwrap().push((
                record.level(),
                record.target().to_string(),
                record.args().to_string(),
            ));
        }

        fn flush(&self) {}
    }

    pub fn capture() -> (Logger, Arc<CaptureSink>) {
        let sink = Arc::new(CaptureSink::default());
        (Logger::new(sink.clone()), sink)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::capture;
    use super::*;

    #[test]
    fn test_records_reach_injected_sink() {
        let (logger, sink) = capture();
        logger.info(format_args!("signed {} credential(s)", 2));
        logger.with_target("ocean_sdk::signer").warn(format_args!("slow"));

        let records = sink.records.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], (Level::Info, DEFAULT_TARGET.to_string(), "signed 2 credential(s)".to_string()));
        assert_eq!(records[1].1, "ocean_sdk::signer");
    }

    #[test]
    fn test_global_logger_does_not_panic_without_backend() {
        Logger::global().debug(format_args!("nobody listens"));
        init_env_logger();
        init_env_logger();
    }
}
