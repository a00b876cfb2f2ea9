use crate::core::events::{self, Subscription};

use anyhow::{anyhow, Result};
use embedded_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::modem::Modem;
use esp_idf_svc::sys::{self, esp, EspError};
use esp_idf_svc::wifi::EspWifi;
use log::*;
use maix_httpd_link::{JoinConfig, LinkEvent, Platform, Station, StorageStatus};
use std::sync::mpsc::Sender;

/// Runs the bring-up steps against ESP-IDF.
pub struct EspPlatform {
    modem: Option<Modem>,
    events: Sender<LinkEvent>,
    sysloop: Option<EspSystemEventLoop>,
    subscriptions: Vec<Subscription>,
    wifi: Option<EspWifi<'static>>,
    client: Option<ClientConfiguration>,
}

impl EspPlatform {
    pub fn new(modem: Modem, events: Sender<LinkEvent>) -> Self {
        Self {
            modem: Some(modem),
            events,
            sysloop: None,
            subscriptions: Vec::new(),
            wifi: None,
            client: None,
        }
    }

    /// The wifi driver and event subscriptions must outlive the monitor.
    pub fn into_station(self) -> Result<EspStation> {
        let wifi = self.wifi.ok_or_else(|| anyhow!("wifi not initialized"))?;
        Ok(EspStation {
            wifi,
            _subscriptions: self.subscriptions,
        })
    }

    fn wifi(&mut self) -> Result<&mut EspWifi<'static>> {
        self.wifi.as_mut().ok_or_else(|| anyhow!("wifi not initialized"))
    }
}

impl Platform for EspPlatform {
    type Error = anyhow::Error;

    fn storage_init(&mut self) -> Result<(), StorageStatus> {
        let ret = unsafe { sys::nvs_flash_init() };
        if ret == sys::ESP_ERR_NVS_NO_FREE_PAGES as sys::esp_err_t {
            return Err(StorageStatus::NoFreePages);
        }
        if ret == sys::ESP_ERR_NVS_NEW_VERSION_FOUND as sys::esp_err_t {
            return Err(StorageStatus::NewVersionFound);
        }
        match EspError::from(ret) {
            Some(e) => Err(StorageStatus::Other(e.to_string())),
            None => Ok(()),
        }
    }

    fn storage_erase(&mut self) -> Result<()> {
        esp!(unsafe { sys::nvs_flash_erase() })?;
        Ok(())
    }

    fn netif_init(&mut self) -> Result<()> {
        esp!(unsafe { sys::esp_netif_init() })?;
        self.sysloop = Some(EspSystemEventLoop::take()?);
        Ok(())
    }

    fn register_events(&mut self) -> Result<()> {
        let sysloop = self.sysloop.as_ref().ok_or_else(|| anyhow!("no system event loop"))?;
        self.subscriptions = events::subscribe(sysloop, self.events.clone())?;
        Ok(())
    }

    fn wifi_init(&mut self) -> Result<()> {
        let modem = self.modem.take().ok_or_else(|| anyhow!("modem already taken"))?;
        let sysloop = self.sysloop.clone().ok_or_else(|| anyhow!("no system event loop"))?;
        // no nvs partition: credentials stay in RAM
        self.wifi = Some(EspWifi::new(modem, sysloop, None)?);
        Ok(())
    }

    fn set_volatile_storage(&mut self) -> Result<()> {
        esp!(unsafe { sys::esp_wifi_set_storage(sys::wifi_storage_t_WIFI_STORAGE_RAM) })?;
        Ok(())
    }

    fn configure_station(&mut self, config: &JoinConfig) -> Result<()> {
        // lengths were checked when the JoinConfig was built.
        // auth_method is only the scan threshold: open accepts any AP security.
        self.client = Some(ClientConfiguration {
            ssid: config.network_name().into(),
            password: config.passphrase().into(),
            auth_method: AuthMethod::None,
            ..Default::default()
        });
        Ok(())
    }

    fn set_station_mode(&mut self) -> Result<()> {
        esp!(unsafe { sys::esp_wifi_set_mode(sys::wifi_mode_t_WIFI_MODE_STA) })?;
        Ok(())
    }

    fn apply_config(&mut self) -> Result<()> {
        let client = self.client.clone().ok_or_else(|| anyhow!("station not configured"))?;
        self.wifi()?
            .set_configuration(&Configuration::Client(client))?;
        Ok(())
    }

    fn wifi_start(&mut self) -> Result<()> {
        self.wifi()?.start()?;
        info!("wifi started");
        Ok(())
    }
}

pub struct EspStation {
    wifi: EspWifi<'static>,
    _subscriptions: Vec<Subscription>,
}

impl Station for EspStation {
    type Error = EspError;

    fn request_join(&mut self, config: &JoinConfig) -> Result<(), EspError> {
        info!("joining {}", config.network_name());
        self.wifi.connect()
    }
}
