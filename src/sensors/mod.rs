//! Sensor groups and line layouts
//!
//! This module provides the built-in sensor groups wired to the board and
//! the layout logic that maps enabled groups to field offsets in a
//! telemetry line.

pub mod builtin;
pub mod group;
pub mod layout;

pub use builtin::{BEAN_GROUP, BME280_GROUP, OXYGEN_GROUP, SHT35_GROUP};
pub use group::{Quantity, QuantityKind, Rgb, SensorGroup};
pub use layout::{GroupFlags, QuantitySelection, SensorLayout};

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Registry of built-in sensor groups
pub static SENSOR_GROUPS: Lazy<HashMap<&'static str, &'static SensorGroup>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("bme280", &*BME280_GROUP);
    m.insert("bme", &*BME280_GROUP);
    m.insert("sht35", &*SHT35_GROUP);
    m.insert("sht", &*SHT35_GROUP);
    m.insert("oxygen", &*OXYGEN_GROUP);
    m.insert("ox2", &*OXYGEN_GROUP);
    m.insert("bean", &*BEAN_GROUP);
    m.insert("lightblue-bean", &*BEAN_GROUP);
    m
});

/// Get a sensor group by name
pub fn get_group(name: &str) -> Option<&'static SensorGroup> {
    SENSOR_GROUPS.get(name.to_lowercase().as_str()).copied()
}

/// Group names in the order the board prints them
pub fn group_names() -> Vec<&'static str> {
    vec!["bme280", "sht35", "oxygen", "bean"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_aliases() {
        assert_eq!(get_group("BME").map(|g| g.id.as_str()), Some("bme280"));
        assert_eq!(get_group("ox2").map(|g| g.id.as_str()), Some("oxygen"));
        assert!(get_group("dht22").is_none());
    }

    #[test]
    fn test_every_name_resolves() {
        for name in group_names() {
            let group = get_group(name).unwrap();
            assert_eq!(group.id, name);
        }
    }
}
