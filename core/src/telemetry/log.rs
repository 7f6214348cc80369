use log::{error, info, warn};

pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    pub fn record_warn(&self, message: &str) {
        warn!("{}", message);
    }

    /// Loud channel for invariant violations that must never pass silently.
    pub fn record_alert(&self, message: &str) {
        error!("{}", message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
