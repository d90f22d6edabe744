//! Sensor layout: which groups are enabled and where their fields sit
//!
//! A telemetry line is the concatenation of every enabled group's fields in
//! priority order. Offsets come from a prefix sum over the group widths.

use std::ops::Range;

use super::builtin::{BEAN_GROUP, BME280_GROUP, OXYGEN_GROUP, QUANTITY_GROUPS, SHT35_GROUP};
use super::group::{Quantity, SensorGroup};
use crate::telemetry::TelemetryError;

/// Sensor group toggles of the `measure` command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupFlags {
    pub bme: bool,
    pub sht: bool,
    pub ox2: bool,
}

/// Quantity toggles of the `quantities` command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuantitySelection {
    pub temperature: bool,
    pub humidity: bool,
    pub dew_point: bool,
    pub pressure: bool,
    pub oxygen: bool,
    pub voltage: bool,
}

impl QuantitySelection {
    /// Every quantity enabled
    pub fn all() -> Self {
        Self {
            temperature: true,
            humidity: true,
            dew_point: true,
            pressure: true,
            oxygen: true,
            voltage: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Selection actually used: `all`, or nothing picked, means everything
    pub fn resolve(self, all: bool) -> Self {
        if all || self.is_empty() {
            Self::all()
        } else {
            self
        }
    }

    /// Flags in line order, matching `QUANTITY_GROUPS`
    fn flags(&self) -> [bool; 6] {
        [
            self.temperature,
            self.humidity,
            self.dew_point,
            self.pressure,
            self.oxygen,
            self.voltage,
        ]
    }
}

/// Ordered list of enabled sensor groups
#[derive(Debug, Clone, PartialEq)]
pub struct SensorLayout {
    groups: Vec<SensorGroup>,
}

impl SensorLayout {
    pub fn new(groups: Vec<SensorGroup>) -> Self {
        Self { groups }
    }

    /// BME280, SHT35 and oxygen as selected; the bean group is always last
    pub fn legacy(flags: GroupFlags) -> Self {
        let candidates: [(bool, &SensorGroup); 4] = [
            (flags.bme, &*BME280_GROUP),
            (flags.sht, &*SHT35_GROUP),
            (flags.ox2, &*OXYGEN_GROUP),
            (true, &*BEAN_GROUP),
        ];

        Self::new(
            candidates
                .into_iter()
                .filter(|(enabled, _)| *enabled)
                .map(|(_, group)| group.clone())
                .collect(),
        )
    }

    /// One field per selected quantity
    pub fn per_quantity(selection: QuantitySelection) -> Self {
        Self::new(
            QUANTITY_GROUPS
                .iter()
                .zip(selection.flags())
                .filter(|(_, enabled)| *enabled)
                .map(|(group, _)| group.clone())
                .collect(),
        )
    }

    /// All quantities in line order
    pub fn quantities(&self) -> impl Iterator<Item = &Quantity> {
        self.groups.iter().flat_map(|g| g.quantities.iter())
    }

    pub fn quantity_count(&self) -> usize {
        self.quantities().count()
    }

    /// Number of tokens a line must have
    pub fn expected_fields(&self) -> usize {
        self.groups.iter().map(SensorGroup::width).sum()
    }

    /// Token range of each group
    pub fn offsets(&self) -> Vec<(&SensorGroup, Range<usize>)> {
        let mut start = 0;
        self.groups
            .iter()
            .map(|group| {
                let range = start..start + group.width();
                start = range.end;
                (group, range)
            })
            .collect()
    }

    /// Check the token count against the enabled groups
    pub fn validate(&self, tokens: &[&str]) -> Result<(), TelemetryError> {
        let expected = self.expected_fields();
        if tokens.len() != expected {
            return Err(TelemetryError::FieldCount {
                expected,
                found: tokens.len(),
            });
        }
        Ok(())
    }

    /// Parse a validated line into one value per quantity, in line order
    pub fn dispatch(&self, tokens: &[&str]) -> Result<Vec<f64>, TelemetryError> {
        self.validate(tokens)?;

        let mut values = Vec::with_capacity(tokens.len());
        for (_, range) in self.offsets() {
            for position in range {
                let token = tokens[position];
                let value = token
                    .parse::<f64>()
                    .map_err(|source| TelemetryError::InvalidNumber {
                        position,
                        token: token.to_string(),
                        source,
                    })?;
                values.push(value);
            }
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(line: &str) -> Vec<&str> {
        line.split_whitespace().collect()
    }

    #[test]
    fn test_legacy_expected_fields() {
        for bme in [false, true] {
            for sht in [false, true] {
                for ox2 in [false, true] {
                    let layout = SensorLayout::legacy(GroupFlags { bme, sht, ox2 });
                    let expected = 4 * bme as usize + 3 * sht as usize + ox2 as usize + 2;
                    assert_eq!(layout.expected_fields(), expected);
                }
            }
        }
    }

    #[test]
    fn test_quantity_expected_fields() {
        for mask in 0u8..64 {
            let selection = QuantitySelection {
                temperature: mask & 1 != 0,
                humidity: mask & 2 != 0,
                dew_point: mask & 4 != 0,
                pressure: mask & 8 != 0,
                oxygen: mask & 16 != 0,
                voltage: mask & 32 != 0,
            };
            let layout = SensorLayout::per_quantity(selection);
            assert_eq!(layout.expected_fields(), mask.count_ones() as usize);
        }
    }

    #[test]
    fn test_resolve_defaults_to_all() {
        assert_eq!(QuantitySelection::default().resolve(false), QuantitySelection::all());

        let only_t = QuantitySelection {
            temperature: true,
            ..Default::default()
        };
        assert_eq!(only_t.resolve(false), only_t);
        assert_eq!(only_t.resolve(true), QuantitySelection::all());
    }

    #[test]
    fn test_offsets_are_prefix_sums() {
        let layout = SensorLayout::legacy(GroupFlags {
            bme: true,
            sht: true,
            ox2: true,
        });
        let ranges: Vec<(String, Range<usize>)> = layout
            .offsets()
            .into_iter()
            .map(|(g, r)| (g.id.clone(), r))
            .collect();

        assert_eq!(
            ranges,
            vec![
                ("bme280".to_string(), 0..4),
                ("sht35".to_string(), 4..7),
                ("oxygen".to_string(), 7..8),
                ("bean".to_string(), 8..10),
            ]
        );
    }

    #[test]
    fn test_offsets_skip_disabled_groups() {
        let layout = SensorLayout::legacy(GroupFlags {
            bme: false,
            sht: true,
            ox2: true,
        });
        let offsets = layout.offsets();
        assert_eq!(offsets[0].1, 0..3);
        assert_eq!(offsets[1].1, 3..4);
        assert_eq!(offsets[2].0.id, "bean");
        assert_eq!(offsets[2].1, 4..6);
    }

    #[test]
    fn test_dispatch_per_quantity() {
        let layout = SensorLayout::per_quantity(QuantitySelection {
            temperature: true,
            humidity: true,
            dew_point: true,
            pressure: true,
            voltage: true,
            oxygen: false,
        });

        let values = layout.dispatch(&split("21.5 45.2 10.1 1013.2 3.7")).unwrap();
        assert_eq!(values, vec![21.5, 45.2, 10.1, 1013.2, 3.7]);

        let ids: Vec<&str> = layout.quantities().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["temperature", "humidity", "dew-point", "pressure", "voltage"]);
    }

    #[test]
    fn test_validate_rejects_count_mismatch() {
        let layout = SensorLayout::per_quantity(QuantitySelection {
            oxygen: false,
            ..QuantitySelection::all()
        });

        match layout.validate(&split("21.5 45.2")) {
            Err(TelemetryError::FieldCount { expected, found }) => {
                assert_eq!(expected, 5);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_dispatch_reports_bad_token() {
        let layout = SensorLayout::legacy(GroupFlags::default());

        match layout.dispatch(&split("24.1 x3.2")) {
            Err(TelemetryError::InvalidNumber { position, token, .. }) => {
                assert_eq!(position, 1);
                assert_eq!(token, "x3.2");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_legacy_dispatch_order() {
        let layout = SensorLayout::legacy(GroupFlags {
            bme: true,
            sht: false,
            ox2: true,
        });
        let values = layout
            .dispatch(&split("22.0 40.0 8.1 1009.5 20.9 23.4 3.1"))
            .unwrap();

        let labelled: Vec<(&str, f64)> = layout
            .quantities()
            .map(|q| q.id.as_str())
            .zip(values)
            .collect();
        assert_eq!(
            labelled,
            vec![
                ("t_bme", 22.0),
                ("rh_bme", 40.0),
                ("dp_bme", 8.1),
                ("p_bme", 1009.5),
                ("o2", 20.9),
                ("t_bean", 23.4),
                ("v_bean", 3.1),
            ]
        );
    }
}
