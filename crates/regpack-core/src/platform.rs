//! Clock periods and target platform presets.
//!
//! Duration conversion needs the period of the fabric clock. Periods are held
//! in integer picoseconds so fractional-nanosecond clocks (1250 MHz, 5 GHz)
//! convert exactly.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ConversionError, Result};

const PICOS_PER_NANO: u64 = 1_000;
const PICOS_PER_MICRO: u64 = 1_000_000;

/// The period of one clock cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClockPeriod {
    picos: u64,
}

impl ClockPeriod {
    pub fn from_picos(picos: u64) -> Result<Self> {
        if picos == 0 {
            return Err(ConversionError::InvalidClock {
                reason: "clock period must be non-zero".into(),
            });
        }
        Ok(Self { picos })
    }

    pub fn from_nanos(nanos: u64) -> Result<Self> {
        let picos = nanos
            .checked_mul(PICOS_PER_NANO)
            .ok_or_else(|| ConversionError::InvalidClock {
                reason: format!("{nanos} ns period is too large"),
            })?;
        Self::from_picos(picos)
    }

    /// Period of a clock running at `mhz`. The period must be a whole number of picoseconds.
    pub fn from_mhz(mhz: u64) -> Result<Self> {
        if mhz == 0 {
            return Err(ConversionError::InvalidClock {
                reason: "clock frequency must be non-zero".into(),
            });
        }
        if PICOS_PER_MICRO % mhz != 0 {
            return Err(ConversionError::InvalidClock {
                reason: format!("{mhz} MHz does not have a whole-picosecond period"),
            });
        }
        Self::from_picos(PICOS_PER_MICRO / mhz)
    }

    pub fn picos(self) -> u64 {
        self.picos
    }

    /// Frequency in MHz, truncated.
    pub fn mhz(self) -> u64 {
        PICOS_PER_MICRO / self.picos
    }
}

impl fmt::Display for ClockPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.picos / PICOS_PER_NANO;
        let frac = self.picos % PICOS_PER_NANO;
        if frac == 0 {
            write!(f, "{whole} ns")
        } else {
            let digits = format!("{frac:03}");
            write!(f, "{whole}.{} ns", digits.trim_end_matches('0'))
        }
    }
}

/// A target instrument with a fixed fabric clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Platform {
    pub id: &'static str,
    pub display_name: &'static str,
    pub clock_mhz: u64,
    /// Number of instrument slots hosting custom logic.
    pub slots: u8,
}

static BUILTIN: [Platform; 4] = [
    Platform {
        id: "moku_go",
        display_name: "Moku:Go",
        clock_mhz: 125,
        slots: 2,
    },
    Platform {
        id: "moku_lab",
        display_name: "Moku:Lab",
        clock_mhz: 500,
        slots: 2,
    },
    Platform {
        id: "moku_pro",
        display_name: "Moku:Pro",
        clock_mhz: 1250,
        slots: 4,
    },
    Platform {
        id: "moku_delta",
        display_name: "Moku:Delta",
        clock_mhz: 5000,
        slots: 3,
    },
];

impl Platform {
    /// All built-in presets.
    pub fn builtin() -> &'static [Platform] {
        &BUILTIN
    }

    /// Find a preset by id. Accepts `-` in place of `_`.
    pub fn resolve(id: &str) -> Option<&'static Platform> {
        let id = id.trim().to_ascii_lowercase().replace('-', "_");
        BUILTIN.iter().find(|p| p.id == id)
    }

    pub fn moku_go() -> &'static Platform {
        &BUILTIN[0]
    }

    pub fn moku_lab() -> &'static Platform {
        &BUILTIN[1]
    }

    pub fn moku_pro() -> &'static Platform {
        &BUILTIN[2]
    }

    pub fn moku_delta() -> &'static Platform {
        &BUILTIN[3]
    }

    pub fn clock_period(&self) -> Result<ClockPeriod> {
        ClockPeriod::from_mhz(self.clock_mhz)
    }
}
