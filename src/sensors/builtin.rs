//! Built-in sensor groups
//!
//! The instruments the board firmware knows about, in the order it prints
//! them, plus the one-field quantities used by the per-quantity layout.

use super::group::{Quantity, QuantityKind, Rgb, SensorGroup};
use once_cell::sync::Lazy;

/// Bosch BME280: temperature, humidity, dew point, pressure
pub static BME280_GROUP: Lazy<SensorGroup> = Lazy::new(|| {
    let mut group = SensorGroup::new("bme280", "BME280");
    group.description = "Bosch combined humidity, pressure and temperature sensor".to_string();
    group.add_quantity(Quantity::new("t_bme", "t BME", "C", QuantityKind::Temperature, Rgb(255, 0, 0)));
    group.add_quantity(Quantity::new("rh_bme", "RH BME", "%", QuantityKind::Humidity, Rgb(0, 255, 255)));
    group.add_quantity(Quantity::new("dp_bme", "DP BME", "C", QuantityKind::DewPoint, Rgb(255, 165, 0)));
    group.add_quantity(Quantity::new("p_bme", "p BME", "hPa", QuantityKind::Pressure, Rgb(0, 255, 0)));
    group
});

/// Sensirion SHT35: temperature, humidity, dew point
pub static SHT35_GROUP: Lazy<SensorGroup> = Lazy::new(|| {
    let mut group = SensorGroup::new("sht35", "SHT35");
    group.description = "Sensirion humidity and temperature sensor".to_string();
    group.add_quantity(Quantity::new("t_sht", "t SHT", "C", QuantityKind::Temperature, Rgb(139, 0, 0)));
    group.add_quantity(Quantity::new("rh_sht", "RH SHT", "%", QuantityKind::Humidity, Rgb(0, 139, 139)));
    group.add_quantity(Quantity::new("dp_sht", "DP SHT", "C", QuantityKind::DewPoint, Rgb(255, 140, 0)));
    group
});

/// Oxygen sensor: O2 concentration
pub static OXYGEN_GROUP: Lazy<SensorGroup> = Lazy::new(|| {
    let mut group = SensorGroup::new("oxygen", "Oxygen");
    group.description = "Electrochemical oxygen sensor".to_string();
    group.add_quantity(Quantity::new("o2", "O2", "%", QuantityKind::Oxygen, Rgb(0, 0, 255)));
    group
});

/// LightBlue Bean itself: board temperature and battery voltage
pub static BEAN_GROUP: Lazy<SensorGroup> = Lazy::new(|| {
    let mut group = SensorGroup::new("bean", "LightBlue Bean");
    group.description = "Board temperature and battery level, always reported".to_string();
    group.add_quantity(Quantity::new("t_bean", "t bean", "C", QuantityKind::Temperature, Rgb(250, 128, 114)));
    group.add_quantity(Quantity::new("v_bean", "v bean", "V", QuantityKind::Voltage, Rgb(0, 128, 0)));
    group
});

/// One-field groups for the per-quantity layout, in line order
pub static QUANTITY_GROUPS: Lazy<Vec<SensorGroup>> = Lazy::new(|| {
    vec![
        SensorGroup::single(Quantity::new("temperature", "t", "C", QuantityKind::Temperature, Rgb(255, 0, 0))),
        SensorGroup::single(Quantity::new("humidity", "RH", "%", QuantityKind::Humidity, Rgb(0, 255, 255))),
        SensorGroup::single(Quantity::new("dew-point", "DP", "C", QuantityKind::DewPoint, Rgb(255, 165, 0))),
        SensorGroup::single(Quantity::new("pressure", "p", "hPa", QuantityKind::Pressure, Rgb(0, 255, 0))),
        SensorGroup::single(Quantity::new("oxygen", "O2", "%", QuantityKind::Oxygen, Rgb(0, 0, 255))),
        SensorGroup::single(Quantity::new("voltage", "v", "V", QuantityKind::Voltage, Rgb(0, 128, 0))),
    ]
});
