//! Packing strategies.
//!
//! A strategy only decides the order in which fields are handed to the
//! sequential packer. Every ordering is a stable sort on fixed keys, so the
//! result depends on nothing but the input.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AllocationError;
use crate::field::Field;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Caller order.
    FirstFit,
    /// Widest first, ties broken by name.
    #[default]
    BestFit,
    /// Voltage outputs, voltage inputs, durations, then booleans; widest first within each.
    TypeClustering,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::FirstFit, Strategy::BestFit, Strategy::TypeClustering];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::FirstFit => "first_fit",
            Strategy::BestFit => "best_fit",
            Strategy::TypeClustering => "type_clustering",
        }
    }

    /// The order in which `fields` are packed.
    pub fn order<'a>(self, fields: &'a [Field]) -> Vec<&'a Field> {
        let mut ordered: Vec<&Field> = fields.iter().collect();
        match self {
            Strategy::FirstFit => {}
            Strategy::BestFit => ordered.sort_by(|a, b| width_then_name(a).cmp(&width_then_name(b))),
            // Category's declaration order is the cluster order.
            Strategy::TypeClustering => ordered.sort_by(|a, b| {
                (a.value_type.category(), width_then_name(a))
                    .cmp(&(b.value_type.category(), width_then_name(b)))
            }),
        }
        ordered
    }
}

fn width_then_name(field: &Field) -> (Reverse<u32>, &str) {
    (Reverse(field.bit_width()), field.name.as_str())
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = AllocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "first_fit" => Ok(Strategy::FirstFit),
            "best_fit" => Ok(Strategy::BestFit),
            "type_clustering" => Ok(Strategy::TypeClustering),
            _ => Err(AllocationError::UnknownStrategy {
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regpack_core::ValueType;

    fn field(name: &str, ty: ValueType) -> Field {
        Field::new(name, ty).unwrap()
    }

    fn names(fields: Vec<&Field>) -> Vec<&str> {
        fields.into_iter().map(|f| f.name.as_str()).collect()
    }

    fn sample() -> Vec<Field> {
        vec![
            field("enable", ValueType::Boolean),
            field("delay", ValueType::PulseDurationNsU8),
            field("sense", ValueType::VoltageInput20vS16),
            field("bias", ValueType::VoltageOutput05vS8),
            field("amp", ValueType::VoltageOutput05vS16),
            field("armed", ValueType::Boolean),
        ]
    }

    #[test]
    fn first_fit_keeps_order() {
        let fields = sample();
        assert_eq!(
            names(Strategy::FirstFit.order(&fields)),
            vec!["enable", "delay", "sense", "bias", "amp", "armed"]
        );
    }

    #[test]
    fn best_fit_width_then_name() {
        let fields = sample();
        assert_eq!(
            names(Strategy::BestFit.order(&fields)),
            vec!["amp", "sense", "bias", "delay", "armed", "enable"]
        );
    }

    #[test]
    fn clustering_groups_by_category() {
        let fields = sample();
        assert_eq!(
            names(Strategy::TypeClustering.order(&fields)),
            vec!["amp", "bias", "sense", "delay", "armed", "enable"]
        );
    }

    #[test]
    fn parse_and_display() {
        for s in Strategy::ALL {
            assert_eq!(s.to_string().parse::<Strategy>().unwrap(), s);
        }
        assert_eq!("best-fit".parse::<Strategy>().unwrap(), Strategy::BestFit);
        match "worst_fit".parse::<Strategy>() {
            Err(AllocationError::UnknownStrategy { name }) => assert_eq!(name, "worst_fit"),
            other => panic!("expected UnknownStrategy, got {other:?}"),
        }
        assert_eq!(Strategy::default(), Strategy::BestFit);
    }
}
