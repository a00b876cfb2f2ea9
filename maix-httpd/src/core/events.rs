use esp_idf_svc::eventloop::{EspSubscription, EspSystemEventLoop, System};
use esp_idf_svc::netif::IpEvent;
use esp_idf_svc::sys::EspError;
use esp_idf_svc::wifi::WifiEvent;
use log::*;
use maix_httpd_link::LinkEvent;
use std::net::Ipv4Addr;
use std::sync::mpsc::Sender;

pub type Subscription = EspSubscription<'static, System>;

/// Forwards station and IP events from the system loop to the monitor thread.
pub fn subscribe(
    sysloop: &EspSystemEventLoop,
    tx: Sender<LinkEvent>,
) -> Result<Vec<Subscription>, EspError> {
    let wifi_tx = tx.clone();
    let wifi = sysloop.subscribe(move |event: &WifiEvent| {
        let ev = match event {
            WifiEvent::StaStarted => LinkEvent::StationStarted,
            WifiEvent::StaDisconnected => LinkEvent::StationDisconnected,
            _ => LinkEvent::Other,
        };
        post(&wifi_tx, ev);
    })?;
    let ip = sysloop.subscribe(move |event: &IpEvent| {
        let ev = match event {
            IpEvent::DhcpIpAssigned(assignment) => {
                LinkEvent::AddressAcquired(Ipv4Addr::from(assignment.ip_settings.ip.octets()))
            }
            _ => LinkEvent::Other,
        };
        post(&tx, ev);
    })?;
    Ok(vec![wifi, ip])
}

fn post(tx: &Sender<LinkEvent>, ev: LinkEvent) {
    if let Err(e) = tx.send(ev) {
        warn!("failed to post link event {:?}", e.0);
    }
}
