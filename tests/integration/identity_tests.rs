//! Device identity against a mock storage port: precedence rules and
//! persistence round-trips.

use cosmopager::adapters::identity::{
    DeviceIdentity, IDENTITY_NAMESPACE, KEY_CUSTOM_NAME, KEY_DEVICE_NUM,
};
use cosmopager::ports::StoragePort;

use crate::mock_adapters::MockStorage;

#[test]
fn fresh_storage_yields_fallback_name() {
    let id = DeviceIdentity::load(MockStorage::new()).unwrap();
    assert_eq!(id.name(), "cosmo-??");
    assert_eq!(id.number(), 0);
    assert!(id.serial().starts_with("CR-"));
    assert_eq!(id.serial().len(), 15);
}

#[test]
fn seeded_number_yields_numbered_name() {
    let mut storage = MockStorage::new();
    storage
        .write(IDENTITY_NAMESPACE, KEY_DEVICE_NUM, &[42])
        .unwrap();
    let id = DeviceIdentity::load(storage).unwrap();
    assert_eq!(id.name(), "cosmo-42");
    assert_eq!(id.number(), 42);
}

#[test]
fn custom_name_takes_precedence_over_number() {
    let mut storage = MockStorage::new();
    storage
        .write(IDENTITY_NAMESPACE, KEY_DEVICE_NUM, &[42])
        .unwrap();
    storage
        .write(IDENTITY_NAMESPACE, KEY_CUSTOM_NAME, b"bench-unit")
        .unwrap();
    let id = DeviceIdentity::load(storage).unwrap();
    assert_eq!(id.name(), "bench-unit");
    // The number is still loaded underneath the custom name.
    assert_eq!(id.number(), 42);
}

#[test]
fn out_of_range_persisted_number_is_ignored() {
    let mut storage = MockStorage::new();
    storage
        .write(IDENTITY_NAMESPACE, KEY_DEVICE_NUM, &[200])
        .unwrap();
    let id = DeviceIdentity::load(storage).unwrap();
    assert_eq!(id.number(), 0);
    assert_eq!(id.name(), "cosmo-??");
}

#[test]
fn set_name_then_reload_sees_custom_name() {
    // Two identities over identically seeded stores model a reboot.
    let mut id = DeviceIdentity::load(MockStorage::new()).unwrap();
    id.set_name("kitchen").unwrap();
    assert_eq!(id.name(), "kitchen");

    let mut seeded = MockStorage::new();
    seeded
        .write(IDENTITY_NAMESPACE, KEY_CUSTOM_NAME, b"kitchen")
        .unwrap();
    let reloaded = DeviceIdentity::load(seeded).unwrap();
    assert_eq!(reloaded.name(), "kitchen");
}

#[test]
fn reset_name_falls_back_to_number() {
    let mut storage = MockStorage::new();
    storage
        .write(IDENTITY_NAMESPACE, KEY_DEVICE_NUM, &[9])
        .unwrap();
    storage
        .write(IDENTITY_NAMESPACE, KEY_CUSTOM_NAME, b"temp-label")
        .unwrap();
    let mut id = DeviceIdentity::load(storage).unwrap();
    assert_eq!(id.name(), "temp-label");
    id.reset_name().unwrap();
    assert_eq!(id.name(), "cosmo-09");
}
