//! Device identity — serial number and human-readable name.
//!
//! The serial is derived from the factory MAC address and never changes:
//! `CR-XXXXXXXXXXXX`.  The name resolves in priority order:
//!
//! 1. custom name persisted in NVS (`device_id/custom_name`)
//! 2. number-based name `cosmo-NN` from the persisted device number (1..=99)
//! 3. fallback `cosmo-??` when neither is set
//!
//! All persistence goes through the [`StoragePort`] trait so host tests
//! can run against an in-memory store.

use core::fmt::Write as _;

use crate::error::{Error, Result, StorageError};
use crate::ports::StoragePort;
use log::{info, warn};

/// NVS namespace for identity data.
pub const IDENTITY_NAMESPACE: &str = "device_id";
/// Key holding a user-assigned custom name.
pub const KEY_CUSTOM_NAME: &str = "custom_name";
/// Key holding the assigned device number (single byte, 1..=99).
pub const KEY_DEVICE_NUM: &str = "device_num";

/// Maximum custom name length in bytes.
pub const DEVICE_NAME_MAX_LEN: usize = 20;

pub struct DeviceIdentity<S: StoragePort> {
    storage: S,
    mac: [u8; 6],
    serial: heapless::String<16>,
    name: heapless::String<DEVICE_NAME_MAX_LEN>,
    number: u8,
}

impl<S: StoragePort> DeviceIdentity<S> {
    /// Read the MAC, derive the serial, and load name/number from storage.
    pub fn load(storage: S) -> Result<Self> {
        let mac = read_mac()?;

        let mut serial = heapless::String::new();
        write!(
            serial,
            "CR-{:02X}{:02X}{:02X}{:02X}{:02X}{:02X}",
            mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
        )
        .map_err(|_| Error::Identity("serial format"))?;

        let mut identity = Self {
            storage,
            mac,
            serial,
            name: heapless::String::new(),
            number: 0,
        };

        let mut num_buf = [0u8; 1];
        match identity
            .storage
            .read(IDENTITY_NAMESPACE, KEY_DEVICE_NUM, &mut num_buf)
        {
            Ok(1) if (1..=99).contains(&num_buf[0]) => {
                identity.number = num_buf[0];
                info!("identity: device number {:02} loaded", identity.number);
            }
            Ok(_) | Err(StorageError::NotFound) => {}
            Err(e) => return Err(Error::Storage(e)),
        }

        let mut name_buf = [0u8; DEVICE_NAME_MAX_LEN];
        match identity
            .storage
            .read(IDENTITY_NAMESPACE, KEY_CUSTOM_NAME, &mut name_buf)
        {
            Ok(len) if len > 0 => {
                let text = core::str::from_utf8(&name_buf[..len])
                    .map_err(|_| Error::Identity("custom name not utf-8"))?;
                identity.name = heapless::String::try_from(text)
                    .map_err(|_| Error::Identity("custom name too long"))?;
                info!("identity: custom name '{}' loaded", identity.name);
            }
            Ok(_) | Err(StorageError::NotFound) => {
                identity.apply_default_name();
            }
            Err(e) => return Err(Error::Storage(e)),
        }

        info!(
            "identity: name={} serial={} mac={:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            identity.name, identity.serial, mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
        );

        Ok(identity)
    }

    /// Human-readable device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Immutable serial number, `CR-` followed by the 12-digit MAC.
    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// Assigned device number, 0 when unset.
    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn mac(&self) -> [u8; 6] {
        self.mac
    }

    /// Persist a custom name. Rejects empty or over-long names.
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        if name.is_empty() || name.len() > DEVICE_NAME_MAX_LEN {
            return Err(Error::Identity("name must be 1..=20 bytes"));
        }
        self.storage
            .write(IDENTITY_NAMESPACE, KEY_CUSTOM_NAME, name.as_bytes())
            .map_err(Error::Storage)?;
        self.name = heapless::String::try_from(name)
            .map_err(|_| Error::Identity("name must be 1..=20 bytes"))?;
        info!("identity: custom name set to '{}'", self.name);
        Ok(())
    }

    /// Drop any custom name and fall back to the number-based default.
    pub fn reset_name(&mut self) -> Result<()> {
        self.storage
            .delete(IDENTITY_NAMESPACE, KEY_CUSTOM_NAME)
            .map_err(Error::Storage)?;
        self.apply_default_name();
        info!("identity: name reset to '{}'", self.name);
        Ok(())
    }

    /// Persist a device number (1..=99) and switch to the number-based
    /// name, clearing any custom name.
    pub fn set_number(&mut self, num: u8) -> Result<()> {
        if !(1..=99).contains(&num) {
            return Err(Error::Identity("device number must be 1..=99"));
        }
        self.storage
            .write(IDENTITY_NAMESPACE, KEY_DEVICE_NUM, &[num])
            .map_err(Error::Storage)?;
        self.storage
            .delete(IDENTITY_NAMESPACE, KEY_CUSTOM_NAME)
            .map_err(Error::Storage)?;
        self.number = num;
        self.apply_default_name();
        info!("identity: device number set to {:02} -> {}", num, self.name);
        Ok(())
    }

    fn apply_default_name(&mut self) {
        self.name.clear();
        if (1..=99).contains(&self.number) {
            let _ = write!(self.name, "cosmo-{:02}", self.number);
        } else {
            let _ = write!(self.name, "cosmo-??");
            warn!("identity: device number not set");
        }
    }
}

/// Read the factory base MAC address.
#[cfg(target_os = "espidf")]
fn read_mac() -> Result<[u8; 6]> {
    let mut mac = [0u8; 6];
    // SAFETY: mac is a valid 6-byte buffer for the requested MAC type.
    let ret = unsafe {
        esp_idf_svc::sys::esp_read_mac(
            mac.as_mut_ptr(),
            esp_idf_svc::sys::esp_mac_type_t_ESP_MAC_BT,
        )
    };
    if ret != esp_idf_svc::sys::ESP_OK as i32 {
        return Err(Error::Identity("MAC read failed"));
    }
    Ok(mac)
}

#[cfg(not(target_os = "espidf"))]
fn read_mac() -> Result<[u8; 6]> {
    Ok([0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE])
}
