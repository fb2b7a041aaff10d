//! Persisted allocation records.
//!
//! The on-disk JSON form: a flat list of mappings plus a summary block.
//! Loading a record re-validates it before it becomes an [`Allocation`].

use regpack_alloc::{Allocation, Placement, Strategy, TOTAL_BITS};
use regpack_core::ValueType;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::format::round2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingRecord {
    pub name: String,
    pub datatype: ValueType,
    pub cr_number: u8,
    /// `[msb, lsb]`.
    pub bit_slice: [u8; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub bits_used: u32,
    pub bits_available: u32,
    pub efficiency_percent: f64,
    pub registers_used: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRecord {
    pub mappings: Vec<MappingRecord>,
    pub summary: SummaryRecord,
}

impl AllocationRecord {
    pub fn from_allocation(allocation: &Allocation) -> Self {
        let mappings = allocation
            .placements()
            .iter()
            .map(|p| MappingRecord {
                name: p.name.clone(),
                datatype: p.value_type,
                cr_number: p.register,
                bit_slice: [p.msb, p.lsb],
            })
            .collect();
        let bits_used = allocation.bits_used();
        Self {
            mappings,
            summary: SummaryRecord {
                bits_used,
                bits_available: TOTAL_BITS,
                efficiency_percent: round2(bits_used as f64 / TOTAL_BITS as f64 * 100.0),
                registers_used: allocation.registers_used(),
            },
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rebuild a validated allocation. The summary block is informational and
    /// is recomputed rather than trusted.
    pub fn into_allocation(self, strategy: Strategy) -> Result<Allocation> {
        let placements = self
            .mappings
            .into_iter()
            .map(|m| Placement {
                name: m.name,
                value_type: m.datatype,
                register: m.cr_number,
                msb: m.bit_slice[0],
                lsb: m.bit_slice[1],
            })
            .collect();
        Ok(Allocation::from_placements(strategy, placements)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use crate::report::AllocationReport;
    use regpack_alloc::{allocate, AllocationError, Field};

    fn example() -> Allocation {
        let fields = vec![
            Field::new("enable", ValueType::Boolean).unwrap(),
            Field::new("intensity", ValueType::VoltageOutput05vS16).unwrap(),
        ];
        allocate(&fields, Strategy::BestFit).unwrap()
    }

    #[test]
    fn json_shape() {
        let alloc = example();
        let json = AllocationReport::new(&alloc).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["mappings"][0]["name"], "intensity");
        assert_eq!(value["mappings"][0]["datatype"], "voltage_output_05v_s16");
        assert_eq!(value["mappings"][0]["cr_number"], 6);
        assert_eq!(value["mappings"][0]["bit_slice"], serde_json::json!([31, 16]));
        assert_eq!(value["mappings"][1]["bit_slice"], serde_json::json!([15, 15]));
        assert_eq!(value["summary"]["bits_used"], 17);
        assert_eq!(value["summary"]["bits_available"], 384);
        assert_eq!(value["summary"]["efficiency_percent"], 4.43);
        assert_eq!(value["summary"]["registers_used"], 1);
    }

    #[test]
    fn reload_matches() {
        let alloc = example();
        let json = AllocationReport::new(&alloc).to_json().unwrap();
        let restored = AllocationRecord::from_json(&json)
            .unwrap()
            .into_allocation(Strategy::BestFit)
            .unwrap();
        assert_eq!(restored, alloc);
        assert_eq!(restored.fingerprint().unwrap(), alloc.fingerprint().unwrap());
    }

    #[test]
    fn reload_rejects_collisions() {
        let json = r#"{
            "mappings": [
                {"name": "a", "datatype": "pulse_duration_ns_u8", "cr_number": 6, "bit_slice": [31, 24]},
                {"name": "b", "datatype": "boolean", "cr_number": 6, "bit_slice": [24, 24]}
            ],
            "summary": {"bits_used": 9, "bits_available": 384, "efficiency_percent": 2.34, "registers_used": 1}
        }"#;
        let err = AllocationRecord::from_json(json)
            .unwrap()
            .into_allocation(Strategy::FirstFit)
            .unwrap_err();
        assert!(matches!(
            err,
            ReportError::Allocation(AllocationError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn reload_rejects_unknown_type() {
        let json = r#"{"mappings": [{"name": "a", "datatype": "voltage_output_10v_s8", "cr_number": 6, "bit_slice": [7, 0]}],
            "summary": {"bits_used": 8, "bits_available": 384, "efficiency_percent": 2.08, "registers_used": 1}}"#;
        assert!(matches!(
            AllocationRecord::from_json(json),
            Err(ReportError::Serialization(_))
        ));
    }
}
