use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// A named point in the bring-up sequence or the link lifecycle that can fail.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Step {
    StorageInit,
    StorageErase,
    NetifInit,
    RegisterEvents,
    WifiInit,
    VolatileStorage,
    ConfigureStation,
    StationMode,
    ApplyConfig,
    WifiStart,
    Join,
    ServerStart,
    ServerStop,
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Step::StorageInit => "storage init",
            Step::StorageErase => "storage erase",
            Step::NetifInit => "netif init",
            Step::RegisterEvents => "event registration",
            Step::WifiInit => "wifi init",
            Step::VolatileStorage => "wifi storage",
            Step::ConfigureStation => "station config",
            Step::StationMode => "station mode",
            Step::ApplyConfig => "apply config",
            Step::WifiStart => "wifi start",
            Step::Join => "join request",
            Step::ServerStart => "server start",
            Step::ServerStop => "server stop",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The device cannot continue; the entry point restarts it.
    #[error("fatal: {step} failed: {reason}")]
    Fatal { step: Step, reason: String },
    #[error("invalid join config: {0}")]
    Config(String),
}

impl Error {
    pub fn fatal(step: Step, reason: impl fmt::Display) -> Self {
        Error::Fatal {
            step,
            reason: reason.to_string(),
        }
    }
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Fatal { .. })
    }
}

#[cfg(test)]
mod tests {
    use crate::error::*;

    #[test]
    fn test_fatal_display() {
        let e = Error::fatal(Step::WifiStart, "ESP_FAIL");
        assert!(e.is_fatal());
        assert_eq!(e.to_string(), "fatal: wifi start failed: ESP_FAIL");
        let c = Error::Config("too long".to_string());
        assert!(!c.is_fatal());
    }
}
