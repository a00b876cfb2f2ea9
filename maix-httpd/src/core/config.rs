use anyhow::Result;
use maix_httpd_link::JoinConfig;

// SSID and PASS are read when the firmware is built
pub fn load() -> Result<JoinConfig> {
    let config = JoinConfig::from_env(option_env!("SSID"), option_env!("PASS"))?;
    log::info!("join config {:?}", config);
    Ok(config)
}
