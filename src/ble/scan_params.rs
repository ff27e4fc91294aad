//! Scan-parameter types shared by the controller and the host glue.

use crate::config;
use crate::error::Error;

/// GAP lower bound for scan interval and window (0.625 ms units).
pub const SCAN_UNITS_MIN: u16 = 0x0004;
/// GAP upper bound for scan interval and window (0.625 ms units).
pub const SCAN_UNITS_MAX: u16 = 0x4000;

/// Set of radio PHYs, encoded as the GAP PHY bitmask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhySet(u8);

impl PhySet {
    pub const LE_1M: PhySet = PhySet(0x01);
    pub const LE_2M: PhySet = PhySet(0x02);
    pub const LE_CODED: PhySet = PhySet(0x04);

    pub const fn union(self, other: PhySet) -> PhySet {
        PhySet(self.0 | other.0)
    }

    pub const fn contains(self, other: PhySet) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn bits(self) -> u8 {
        self.0
    }
}

/// Radio scan configuration.
///
/// Validated on construction and immutable for the lifetime of one
/// scan session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanParameters {
    phys: PhySet,
    /// 0.625 ms units.
    interval: u16,
    /// 0.625 ms units; at most `interval`.
    window: u16,
    /// Active scanning additionally issues scan requests.
    active: bool,
}

impl ScanParameters {
    /// Window must not exceed interval, and both must stay inside the
    /// GAP range; at least one PHY must be selected.
    pub fn new(phys: PhySet, interval: u16, window: u16, active: bool) -> Result<Self, Error> {
        if phys.is_empty()
            || interval < SCAN_UNITS_MIN
            || interval > SCAN_UNITS_MAX
            || window < SCAN_UNITS_MIN
            || window > interval
        {
            return Err(Error::InvalidScanParameters);
        }
        Ok(Self {
            phys,
            interval,
            window,
            active,
        })
    }

    pub const fn phys(&self) -> PhySet {
        self.phys
    }

    pub const fn interval_units(&self) -> u16 {
        self.interval
    }

    pub const fn window_units(&self) -> u16 {
        self.window
    }

    pub const fn active(&self) -> bool {
        self.active
    }

    /// Interval in milliseconds, rounded down (1 unit = 0.625 ms).
    pub const fn interval_ms(&self) -> u32 {
        self.interval as u32 * 625 / 1000
    }

    /// Window in milliseconds, rounded down.
    pub const fn window_ms(&self) -> u32 {
        self.window as u32 * 625 / 1000
    }
}

impl Default for ScanParameters {
    fn default() -> Self {
        // The config constants are kept inside the GAP range, so this
        // never goes through the fallible constructor.
        Self {
            phys: PhySet::LE_1M,
            interval: config::SCAN_INTERVAL_UNITS,
            window: config::SCAN_WINDOW_UNITS,
            active: config::ACTIVE_SCANNING,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests (run on host, not embedded)
// ═══════════════════════════════════════════════════════════════════════════
