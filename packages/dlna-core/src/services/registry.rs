//! Deduplicated, ordered store of discovered renderers.

use parking_lot::Mutex;

use crate::upnp::Device;

/// Discovered devices in insertion order.
///
/// Two entries never share a non-empty UDN. Devices without a UDN are never
/// treated as duplicates. Every operation takes the lock once, so concurrent
/// fetch completions cannot race a check against an append.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: Mutex<Vec<Device>>,
}

impl DeviceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `device` unless an entry with the same non-empty UDN exists.
    pub fn try_insert(&self, device: Device) -> bool {
        let mut devices = self.devices.lock();
        if let Some(key) = device.dedup_key() {
            if devices.iter().any(|d| d.dedup_key() == Some(key)) {
                log::trace!("[Registry] Duplicate {} ({})", device.name, key);
                return false;
            }
        }
        log::debug!("[Registry] Added {} ({} total)", device.name, devices.len() + 1);
        devices.push(device);
        true
    }

    /// Returns a copy of the current entries.
    pub fn snapshot(&self) -> Vec<Device> {
        self.devices.lock().clone()
    }

    /// Removes every entry, returning what was removed.
    pub fn clear(&self) -> Vec<Device> {
        let removed = std::mem::take(&mut *self.devices.lock());
        if !removed.is_empty() {
            log::debug!("[Registry] Cleared {} device(s)", removed.len());
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.devices.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn device(name: &str, udn: Option<&str>) -> Device {
        Device {
            name: name.to_string(),
            manufacturer: None,
            location: format!("http://10.0.0.1/{name}.xml"),
            control_url: None,
            udn: udn.map(str::to_string),
        }
    }

    #[test]
    fn rejects_duplicate_udn() {
        let registry = DeviceRegistry::new();
        assert!(registry.try_insert(device("a", Some("uuid:1"))));
        assert!(!registry.try_insert(device("a-again", Some("uuid:1"))));
        assert!(registry.try_insert(device("b", Some("uuid:2"))));

        let names: Vec<_> = registry.snapshot().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn devices_without_udn_always_append() {
        let registry = DeviceRegistry::new();
        assert!(registry.try_insert(device("x", None)));
        assert!(registry.try_insert(device("x", None)));
        assert!(registry.try_insert(device("y", Some(""))));
        assert!(registry.try_insert(device("y", Some(""))));
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn snapshot_is_independent_copy() {
        let registry = DeviceRegistry::new();
        registry.try_insert(device("a", Some("uuid:1")));
        let snapshot = registry.snapshot();
        registry.try_insert(device("b", Some("uuid:2")));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn clear_returns_removed_devices() {
        let registry = DeviceRegistry::new();
        registry.try_insert(device("a", Some("uuid:1")));
        registry.try_insert(device("b", None));

        let removed = registry.clear();
        assert_eq!(removed.len(), 2);
        assert!(registry.is_empty());
        assert!(registry.try_insert(device("a", Some("uuid:1"))));
    }

    #[test]
    fn concurrent_inserts_keep_udns_unique() {
        let registry = Arc::new(DeviceRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        let udn = format!("uuid:{}", i % 10);
                        registry.try_insert(device(&format!("t{t}-{i}"), Some(&udn)));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread");
        }

        let snapshot = registry.snapshot();
        let unique: HashSet<_> = snapshot.iter().filter_map(|d| d.udn.clone()).collect();
        assert_eq!(snapshot.len(), 10);
        assert_eq!(unique.len(), 10);
    }
}
