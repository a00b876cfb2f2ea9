use crate::error::{Error, Result};
use std::fmt;

pub const MAX_NETWORK_NAME_LEN: usize = 32;
pub const MAX_PASSPHRASE_LEN: usize = 64;

pub const DEFAULT_NETWORK_NAME: &str = "internet";
pub const DEFAULT_PASSPHRASE: &str = "internet_wifi";

/// Station credentials, fixed for the life of the process.
#[derive(Clone, PartialEq, Eq)]
pub struct JoinConfig {
    network_name: String,
    passphrase: String,
}

impl JoinConfig {
    pub fn new(network_name: &str, passphrase: &str) -> Result<Self> {
        if network_name.is_empty() {
            return Err(Error::Config("network name is empty".to_string()));
        }
        if network_name.len() > MAX_NETWORK_NAME_LEN {
            return Err(Error::Config(format!(
                "network name is {} bytes, max {}",
                network_name.len(),
                MAX_NETWORK_NAME_LEN
            )));
        }
        if passphrase.len() > MAX_PASSPHRASE_LEN {
            return Err(Error::Config(format!(
                "passphrase is {} bytes, max {}",
                passphrase.len(),
                MAX_PASSPHRASE_LEN
            )));
        }
        Ok(Self {
            network_name: network_name.to_string(),
            passphrase: passphrase.to_string(),
        })
    }

    // the firmware passes option_env!("SSID") / option_env!("PASS")
    pub fn from_env(network_name: Option<&str>, passphrase: Option<&str>) -> Result<Self> {
        Self::new(
            network_name.unwrap_or(DEFAULT_NETWORK_NAME),
            passphrase.unwrap_or(DEFAULT_PASSPHRASE),
        )
    }

    pub fn network_name(&self) -> &str {
        &self.network_name
    }

    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }
}

impl fmt::Debug for JoinConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("JoinConfig")
            .field("network_name", &self.network_name)
            .field("passphrase", &"***")
            .finish()
    }
}
