//! Sensor group definitions
//!
//! Defines the instruments wired to the board and the quantities each one
//! contributes to a telemetry line.

use std::fmt;

/// Physical quantity reported by a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantityKind {
    Temperature,
    Humidity,
    DewPoint,
    Pressure,
    Oxygen,
    Voltage,
}

impl fmt::Display for QuantityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantityKind::Temperature => write!(f, "temperature"),
            QuantityKind::Humidity => write!(f, "relative humidity"),
            QuantityKind::DewPoint => write!(f, "dew point"),
            QuantityKind::Pressure => write!(f, "pressure"),
            QuantityKind::Oxygen => write!(f, "oxygen"),
            QuantityKind::Voltage => write!(f, "voltage"),
        }
    }
}

/// Colour used when drawing a quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// A single field of a telemetry line
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    /// Short identifier (e.g., "t_bme")
    pub id: String,
    /// Chart label
    pub label: String,
    /// Unit shown next to the label
    pub unit: String,
    pub kind: QuantityKind,
    pub color: Rgb,
}

impl Quantity {
    pub fn new(id: &str, label: &str, unit: &str, kind: QuantityKind, color: Rgb) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            unit: unit.to_string(),
            kind,
            color,
        }
    }

    /// Legend entry, e.g. "t BME [C]"
    pub fn legend(&self) -> String {
        format!("{} [{}]", self.label, self.unit)
    }
}

/// A logical instrument contributing a fixed number of fields to each line
#[derive(Debug, Clone, PartialEq)]
pub struct SensorGroup {
    /// Short identifier (e.g., "bme280")
    pub id: String,
    /// Display name
    pub name: String,
    pub description: String,
    /// Fields in the order the board prints them
    pub quantities: Vec<Quantity>,
}

impl SensorGroup {
    /// Create a new empty group
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            quantities: Vec::new(),
        }
    }

    /// Wrap one quantity as a one-field group
    pub fn single(quantity: Quantity) -> Self {
        Self {
            id: quantity.id.clone(),
            name: quantity.label.clone(),
            description: quantity.kind.to_string(),
            quantities: vec![quantity],
        }
    }

    /// Append a field to the group
    pub fn add_quantity(&mut self, quantity: Quantity) {
        self.quantities.push(quantity);
    }

    /// Number of whitespace-separated fields this group contributes
    pub fn width(&self) -> usize {
        self.quantities.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_width() {
        let mut group = SensorGroup::new("test", "Test Sensor");
        assert_eq!(group.width(), 0);

        group.add_quantity(Quantity::new("t", "t", "C", QuantityKind::Temperature, Rgb(255, 0, 0)));
        group.add_quantity(Quantity::new("rh", "RH", "%", QuantityKind::Humidity, Rgb(0, 255, 255)));
        assert_eq!(group.width(), 2);
    }

    #[test]
    fn test_single_group() {
        let quantity = Quantity::new("p", "p", "hPa", QuantityKind::Pressure, Rgb(0, 255, 0));
        let group = SensorGroup::single(quantity.clone());

        assert_eq!(group.id, "p");
        assert_eq!(group.width(), 1);
        assert_eq!(group.quantities[0], quantity);
        assert_eq!(quantity.legend(), "p [hPa]");
    }
}
