//! Register allocation: validate a field set, order it, and pack it.
//!
//! Packing is greedy and sequential. Fields are placed from bit 31 downward in
//! the current register; when the next field does not fit the remaining bits,
//! the packer moves to the next register and the leftover low bits stay empty.
//! A smaller later field is never pulled forward to fill the gap.

use std::collections::BTreeMap;

use log::{debug, trace};

use crate::allocation::{Allocation, Placement};
use crate::error::{AllocationError, Result};
use crate::field::{validate_name, Field};
use crate::strategy::Strategy;

/// First application control register.
pub const FIRST_REGISTER: u8 = 6;
/// Last application control register.
pub const LAST_REGISTER: u8 = 17;
pub const REGISTER_BITS: u32 = 32;
pub const REGISTER_COUNT: u32 = (LAST_REGISTER - FIRST_REGISTER + 1) as u32;
pub const TOTAL_BITS: u32 = REGISTER_COUNT * REGISTER_BITS;

/// Allocate every field to a non-overlapping bit range.
///
/// Fails before producing any placement if a name is malformed or repeated,
/// a default is out of domain, the total width exceeds the bank, or a single
/// field is wider than a register.
pub fn allocate(fields: &[Field], strategy: Strategy) -> Result<Allocation> {
    check_fields(fields.iter().map(|f| (f.name.as_str(), f.bit_width())))?;
    for field in fields {
        field.validate()?;
    }

    let ordered = strategy.order(fields);
    debug!(
        "allocating {} fields ({} bits) with {strategy}",
        fields.len(),
        fields.iter().map(Field::bit_width).sum::<u32>()
    );

    let placements = pack_sequential(&ordered)?;
    let allocation = Allocation::new(strategy, placements);
    debug!(
        "{strategy}: {} bits in {} registers",
        allocation.bits_used(),
        allocation.registers_used()
    );
    Ok(allocation)
}

/// Pre-placement checks over `(name, width)` pairs, in order: name syntax,
/// duplicate names, total capacity, per-field width.
pub fn check_fields<'a>(fields: impl IntoIterator<Item = (&'a str, u32)> + Clone) -> Result<()> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for (name, _) in fields.clone() {
        validate_name(name)?;
        *counts.entry(name).or_default() += 1;
    }
    let duplicates: Vec<String> = counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(name, _)| name.to_string())
        .collect();
    if !duplicates.is_empty() {
        return Err(AllocationError::DuplicateNames { names: duplicates });
    }

    let requested: u32 = fields.clone().into_iter().map(|(_, w)| w).sum();
    if requested > TOTAL_BITS {
        return Err(AllocationError::Overflow {
            requested,
            available: TOTAL_BITS,
            deficit: requested - TOTAL_BITS,
        });
    }

    if let Some((name, width)) = fields.into_iter().find(|(_, w)| *w > REGISTER_BITS) {
        return Err(AllocationError::FieldTooWide {
            name: name.to_string(),
            width,
        });
    }
    Ok(())
}

/// Place fields in the given order, top-down within each register.
pub fn pack_sequential(fields: &[&Field]) -> Result<Vec<Placement>> {
    let top = (REGISTER_BITS - 1) as i32;
    let mut register = FIRST_REGISTER;
    let mut cursor = top;
    let mut placements = Vec::with_capacity(fields.len());

    for field in fields {
        let width = field.bit_width();
        if width > REGISTER_BITS {
            return Err(AllocationError::FieldTooWide {
                name: field.name.clone(),
                width,
            });
        }
        let width = width as i32;
        if cursor + 1 < width {
            register += 1;
            cursor = top;
            if register > LAST_REGISTER {
                return Err(AllocationError::RegistersExhausted {
                    name: field.name.clone(),
                });
            }
        }
        let msb = cursor;
        let lsb = cursor - width + 1;
        trace!("{} -> CR{register}[{msb}:{lsb}]", field.name);
        placements.push(Placement {
            name: field.name.clone(),
            value_type: field.value_type,
            register,
            msb: msb as u8,
            lsb: lsb as u8,
        });
        cursor = lsb - 1;
    }
    Ok(placements)
}
