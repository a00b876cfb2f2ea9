mod conn;
mod core;

use esp_idf_svc::sys as _; // If using the `binstart` feature of `esp-idf-sys`, always keep this module imported

use anyhow::{bail, Result};
use esp_idf_svc::hal::peripherals::Peripherals;
use log::*;
use maix_httpd_link::{bring_up, Monitor};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::conn::http::HttpControl;
use crate::conn::wifi::EspPlatform;

fn main() {
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    if let Err(e) = run() {
        error!("{:?}", e);
        error!("restarting in 3 seconds...");
        thread::sleep(Duration::from_secs(3));
        unsafe { esp_idf_svc::sys::esp_restart() };
    }
}

fn run() -> Result<()> {
    let peripherals = Peripherals::take()?;
    let config = crate::core::config::load()?;

    let (tx, rx) = mpsc::channel();
    let mut platform = EspPlatform::new(peripherals.modem, tx);
    bring_up(&mut platform, &config)?;
    let station = platform.into_station()?;

    let mut monitor = Monitor::new(config, station, HttpControl);
    monitor.run(rx)?;
    bail!("link event channel closed")
}
