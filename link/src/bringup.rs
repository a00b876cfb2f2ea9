use crate::config::JoinConfig;
use crate::error::{Error, Result, Step};
use log::*;
use std::fmt::{self, Display};

/// Outcome of initializing the flash key-value store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageStatus {
    NoFreePages,
    NewVersionFound,
    Other(String),
}

impl StorageStatus {
    /// Both of these are cleared by erasing the partition.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StorageStatus::NoFreePages | StorageStatus::NewVersionFound)
    }
}

impl fmt::Display for StorageStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StorageStatus::NoFreePages => write!(f, "no free pages"),
            StorageStatus::NewVersionFound => write!(f, "new version found"),
            StorageStatus::Other(e) => write!(f, "{}", e),
        }
    }
}

/// The device steps run by [`bring_up`], in the order they are declared.
pub trait Platform {
    type Error: Display;
    fn storage_init(&mut self) -> std::result::Result<(), StorageStatus>;
    fn storage_erase(&mut self) -> std::result::Result<(), Self::Error>;
    fn netif_init(&mut self) -> std::result::Result<(), Self::Error>;
    fn register_events(&mut self) -> std::result::Result<(), Self::Error>;
    fn wifi_init(&mut self) -> std::result::Result<(), Self::Error>;
    fn set_volatile_storage(&mut self) -> std::result::Result<(), Self::Error>;
    fn configure_station(&mut self, config: &JoinConfig) -> std::result::Result<(), Self::Error>;
    fn set_station_mode(&mut self) -> std::result::Result<(), Self::Error>;
    fn apply_config(&mut self) -> std::result::Result<(), Self::Error>;
    fn wifi_start(&mut self) -> std::result::Result<(), Self::Error>;
}

pub fn bring_up<P: Platform>(platform: &mut P, config: &JoinConfig) -> Result<()> {
    init_storage(platform)?;

    let step = |s: Step| move |e: P::Error| Error::fatal(s, e);
    platform.netif_init().map_err(step(Step::NetifInit))?;
    platform.register_events().map_err(step(Step::RegisterEvents))?;
    platform.wifi_init().map_err(step(Step::WifiInit))?;
    platform
        .set_volatile_storage()
        .map_err(step(Step::VolatileStorage))?;
    info!("Setting WiFi configuration SSID {}...", config.network_name());
    platform
        .configure_station(config)
        .map_err(step(Step::ConfigureStation))?;
    platform.set_station_mode().map_err(step(Step::StationMode))?;
    platform.apply_config().map_err(step(Step::ApplyConfig))?;
    platform.wifi_start().map_err(step(Step::WifiStart))?;
    Ok(())
}

fn init_storage<P: Platform>(platform: &mut P) -> Result<()> {
    match platform.storage_init() {
        Ok(()) => Ok(()),
        Err(status) if status.is_recoverable() => {
            warn!("NVS init: {}, erasing", status);
            platform
                .storage_erase()
                .map_err(|e| Error::fatal(Step::StorageErase, e))?;
            platform
                .storage_init()
                .map_err(|e| Error::fatal(Step::StorageInit, e))
        }
        Err(status) => Err(Error::fatal(Step::StorageInit, status)),
    }
}

#[cfg(test)]
mod tests {
    use crate::bringup::*;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
        storage: VecDeque<std::result::Result<(), StorageStatus>>,
        fail_on: Option<&'static str>,
        ssid: Option<String>,
    }

    impl Recorder {
        fn call(&mut self, name: &'static str) -> std::result::Result<(), String> {
            self.calls.push(name);
            if self.fail_on == Some(name) {
                Err(format!("{} ESP_FAIL", name))
            } else {
                Ok(())
            }
        }
    }

    impl Platform for Recorder {
        type Error = String;
        fn storage_init(&mut self) -> std::result::Result<(), StorageStatus> {
            self.calls.push("storage_init");
            self.storage.pop_front().unwrap_or(Ok(()))
        }
        fn storage_erase(&mut self) -> std::result::Result<(), String> {
            self.call("storage_erase")
        }
        fn netif_init(&mut self) -> std::result::Result<(), String> {
            self.call("netif_init")
        }
        fn register_events(&mut self) -> std::result::Result<(), String> {
            self.call("register_events")
        }
        fn wifi_init(&mut self) -> std::result::Result<(), String> {
            self.call("wifi_init")
        }
        fn set_volatile_storage(&mut self) -> std::result::Result<(), String> {
            self.call("set_volatile_storage")
        }
        fn configure_station(&mut self, config: &JoinConfig) -> std::result::Result<(), String> {
            self.ssid = Some(config.network_name().to_string());
            self.call("configure_station")
        }
        fn set_station_mode(&mut self) -> std::result::Result<(), String> {
            self.call("set_station_mode")
        }
        fn apply_config(&mut self) -> std::result::Result<(), String> {
            self.call("apply_config")
        }
        fn wifi_start(&mut self) -> std::result::Result<(), String> {
            self.call("wifi_start")
        }
    }

    const ORDER: [&str; 9] = [
        "storage_init",
        "netif_init",
        "register_events",
        "wifi_init",
        "set_volatile_storage",
        "configure_station",
        "set_station_mode",
        "apply_config",
        "wifi_start",
    ];

    fn config() -> JoinConfig {
        JoinConfig::new("internet", "internet_wifi").unwrap()
    }

    #[test]
    fn test_order() -> anyhow::Result<()> {
        let mut p = Recorder::default();
        bring_up(&mut p, &config())?;
        assert_eq!(p.calls, ORDER.to_vec());
        assert_eq!(p.ssid.as_deref(), Some("internet"));
        Ok(())
    }

    #[test]
    fn test_storage_recovery() -> anyhow::Result<()> {
        for status in [StorageStatus::NoFreePages, StorageStatus::NewVersionFound] {
            let mut p = Recorder::default();
            p.storage.push_back(Err(status));
            bring_up(&mut p, &config())?;
            assert_eq!(&p.calls[..3], &["storage_init", "storage_erase", "storage_init"]);
            assert_eq!(&p.calls[3..], &ORDER[1..]);
        }
        Ok(())
    }

    #[test]
    fn test_storage_recovery_only_once() {
        let mut p = Recorder::default();
        p.storage.push_back(Err(StorageStatus::NoFreePages));
        p.storage.push_back(Err(StorageStatus::NoFreePages));
        let err = bring_up(&mut p, &config()).unwrap_err();
        assert!(matches!(
            err,
            Error::Fatal {
                step: Step::StorageInit,
                ..
            }
        ));
        assert_eq!(p.calls, vec!["storage_init", "storage_erase", "storage_init"]);
    }

    #[test]
    fn test_storage_other_error_is_fatal() {
        let mut p = Recorder::default();
        p.storage
            .push_back(Err(StorageStatus::Other("ESP_ERR_NOT_FOUND".to_string())));
        let err = bring_up(&mut p, &config()).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(p.calls, vec!["storage_init"]);
    }

    #[test]
    fn test_step_failure_stops_sequence() {
        let mut p = Recorder {
            fail_on: Some("wifi_init"),
            ..Default::default()
        };
        let err = bring_up(&mut p, &config()).unwrap_err();
        match err {
            Error::Fatal { step, reason } => {
                assert_eq!(step, Step::WifiInit);
                assert_eq!(reason, "wifi_init ESP_FAIL");
            }
            e => panic!("unexpected {:?}", e),
        }
        assert_eq!(p.calls, ORDER[..4].to_vec());
    }
}
