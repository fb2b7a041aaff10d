//! Computed allocations.

use std::collections::{BTreeMap, BTreeSet};

use regpack_core::convert::width_mask;
use regpack_core::ValueType;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::allocator::{FIRST_REGISTER, LAST_REGISTER, REGISTER_BITS, TOTAL_BITS};
use crate::error::{AllocationError, Result};
use crate::field::validate_name;
use crate::strategy::Strategy;

/// One field's position in the register bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub name: String,
    pub value_type: ValueType,
    /// Control register index, 6..=17.
    pub register: u8,
    pub msb: u8,
    pub lsb: u8,
}

impl Placement {
    pub fn width(&self) -> u32 {
        (self.msb - self.lsb) as u32 + 1
    }

    /// The bits this placement occupies within its register word.
    pub fn mask(&self) -> u32 {
        width_mask(self.width()) << self.lsb
    }

    pub fn overlaps(&self, other: &Placement) -> bool {
        self.register == other.register && self.mask() & other.mask() != 0
    }
}

/// The result of packing a field set with one strategy.
///
/// Placements are kept in packing order. An `Allocation` can only be built by
/// the allocator or through [`Allocation::from_placements`], which enforces
/// the same invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Allocation {
    strategy: Strategy,
    placements: Vec<Placement>,
}

impl Allocation {
    pub(crate) fn new(strategy: Strategy, placements: Vec<Placement>) -> Self {
        Self {
            strategy,
            placements,
        }
    }

    /// Rebuild an allocation from externally supplied placements, re-checking
    /// names, register range, catalog widths and overlap.
    pub fn from_placements(strategy: Strategy, placements: Vec<Placement>) -> Result<Self> {
        let invalid = |reason: String| AllocationError::InvalidRecord { reason };

        let mut seen = BTreeSet::new();
        let mut duplicates = BTreeSet::new();
        for p in &placements {
            validate_name(&p.name)?;
            if !seen.insert(p.name.as_str()) {
                duplicates.insert(p.name.clone());
            }
        }
        if !duplicates.is_empty() {
            return Err(AllocationError::DuplicateNames {
                names: duplicates.into_iter().collect(),
            });
        }

        for p in &placements {
            if !(FIRST_REGISTER..=LAST_REGISTER).contains(&p.register) {
                return Err(invalid(format!(
                    "'{}' is in CR{}, outside CR{FIRST_REGISTER}..CR{LAST_REGISTER}",
                    p.name, p.register
                )));
            }
            if p.lsb > p.msb || p.msb as u32 >= REGISTER_BITS {
                return Err(invalid(format!(
                    "'{}' has invalid bit slice [{}:{}]",
                    p.name, p.msb, p.lsb
                )));
            }
            if p.width() != p.value_type.bit_width() {
                return Err(invalid(format!(
                    "'{}' spans {} bits but {} is {} bits wide",
                    p.name,
                    p.width(),
                    p.value_type,
                    p.value_type.bit_width()
                )));
            }
        }

        for (i, a) in placements.iter().enumerate() {
            if let Some(b) = placements[i + 1..].iter().find(|b| a.overlaps(b)) {
                return Err(invalid(format!(
                    "'{}' and '{}' overlap in CR{}",
                    a.name, b.name, a.register
                )));
            }
        }

        Ok(Self::new(strategy, placements))
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn get(&self, name: &str) -> Option<&Placement> {
        self.placements.iter().find(|p| p.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn bits_used(&self) -> u32 {
        self.placements.iter().map(Placement::width).sum()
    }

    pub fn bits_available(&self) -> u32 {
        TOTAL_BITS
    }

    /// Registers holding at least one placement, ascending.
    pub fn registers(&self) -> BTreeSet<u8> {
        self.placements.iter().map(|p| p.register).collect()
    }

    pub fn registers_used(&self) -> u32 {
        self.registers().len() as u32
    }

    /// Placements grouped by register, each group ordered high bit first.
    pub fn by_register(&self) -> BTreeMap<u8, Vec<&Placement>> {
        let mut groups: BTreeMap<u8, Vec<&Placement>> = BTreeMap::new();
        for p in &self.placements {
            groups.entry(p.register).or_default().push(p);
        }
        for group in groups.values_mut() {
            group.sort_by(|a, b| b.msb.cmp(&a.msb));
        }
        groups
    }

    /// SHA-256 over the canonical JSON of the placements, as lowercase hex.
    ///
    /// Independent of strategy: two strategies that produce the same layout
    /// share a fingerprint.
    pub fn fingerprint(&self) -> Result<String> {
        let json = serde_json::to_vec(&self.placements)?;
        let digest = Sha256::digest(&json);
        Ok(digest.iter().map(|b| format!("{b:02x}")).collect())
    }
}
