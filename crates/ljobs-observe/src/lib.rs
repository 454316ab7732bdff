//! Logging bootstrap shared by the ljobs binaries.
mod config;
mod error;
mod format;
mod install;
mod level;
mod timer;

pub use config::LoggerConfig;
pub use error::{LoggerError, LoggerResult};
pub use format::LoggerFormat;
pub use level::LoggerLevel;
pub use timer::{LoggerTimeZone, init_local_offset};

/// Install the global `tracing` subscriber described by `cfg`.
///
/// Fails with [`LoggerError::AlreadyInitialized`] when a global subscriber is already set.
/// With [`LoggerTimeZone::Local`], call [`init_local_offset`] first, before any thread is spawned.
pub fn init_logger(cfg: &LoggerConfig) -> LoggerResult<()> {
    match cfg.format {
        LoggerFormat::Text => install::install_text(cfg),
        LoggerFormat::Json => install::install_json(cfg),
        LoggerFormat::Journald => install::install_journald(cfg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_rejected() {
        let cfg = LoggerConfig::default().with_level("warn".parse().unwrap());
        let first = init_logger(&cfg);
        let second = init_logger(&cfg);

        assert!(first.is_ok() || matches!(first, Err(LoggerError::AlreadyInitialized)));
        assert!(matches!(second, Err(LoggerError::AlreadyInitialized)));
    }
}
