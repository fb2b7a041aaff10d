//! Control-register word images.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use log::debug;
use regpack_core::convert::{self, width_mask};
use regpack_core::Value;
use serde::Serialize;

use crate::allocation::Allocation;
use crate::error::{AllocationError, Result};
use crate::field::Field;

/// Register words holding every field's default value at its placement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegisterImage {
    words: BTreeMap<u8, u32>,
}

impl RegisterImage {
    /// Encode each field's default (or catalog default) into its bit slice.
    pub fn build(allocation: &Allocation, fields: &[Field]) -> Result<Self> {
        let by_name: HashMap<&str, &Field> = fields.iter().map(|f| (f.name.as_str(), f)).collect();
        let mut words = BTreeMap::new();

        for placement in allocation.placements() {
            let field = by_name
                .get(placement.name.as_str())
                .ok_or_else(|| AllocationError::UnknownField {
                    name: placement.name.clone(),
                })?;
            let bits = convert::encode(placement.value_type, &field.default_value())?;
            *words.entry(placement.register).or_insert(0u32) |= bits << placement.lsb;
        }

        debug!("built image of {} registers", words.len());
        Ok(Self { words })
    }

    pub fn words(&self) -> &BTreeMap<u8, u32> {
        &self.words
    }

    pub fn word(&self, register: u8) -> Option<u32> {
        self.words.get(&register).copied()
    }

    /// Extract and decode one field from the image.
    pub fn read(&self, allocation: &Allocation, name: &str) -> Result<Value> {
        let placement = allocation
            .get(name)
            .ok_or_else(|| AllocationError::UnknownField { name: name.into() })?;
        let word = self.word(placement.register).unwrap_or(0);
        let bits = (word >> placement.lsb) & width_mask(placement.width());
        Ok(convert::decode(placement.value_type, bits)?)
    }
}

impl fmt::Display for RegisterImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (register, word) in &self.words {
            writeln!(f, "CR{register:<2} 0x{word:08X}")?;
        }
        Ok(())
    }
}
