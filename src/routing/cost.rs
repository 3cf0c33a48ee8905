//! Time-of-day cost model
//!
//! Edge weights depend only on the destination cell and on whether the
//! current hour falls inside a rush-hour window.

use super::error::{GridError, Result};
use super::types::CellType;

/// Inclusive hour ranges considered rush hour
pub const PEAK_WINDOWS: [(u8, u8); 3] = [(6, 9), (12, 13), (17, 20)];

/// Street (L/R) weight, unaffected by rush hour
pub const COST_STREET: u32 = 2;
pub const COST_AVENUE_OFF_PEAK: u32 = 1;
pub const COST_AVENUE_PEAK: u32 = 4;
pub const COST_INTERSECTION_OFF_PEAK: u32 = 2;
pub const COST_INTERSECTION_PEAK: u32 = 3;
/// Endpoints, omnidirectional and unrecognized cells
pub const COST_DEFAULT: u32 = 1;

/// Whether `hour` lies in a rush-hour window. Hours past 23 are never peak.
pub fn is_peak_hour(hour: u8) -> bool {
    PEAK_WINDOWS
        .iter()
        .any(|&(start, end)| (start..=end).contains(&hour))
}

/// Weight of moving into a cell of type `target`
pub fn weight(target: CellType, is_peak: bool) -> u32 {
    match target {
        cell if cell.is_street() => COST_STREET,
        cell if cell.is_avenue() && is_peak => COST_AVENUE_PEAK,
        cell if cell.is_avenue() => COST_AVENUE_OFF_PEAK,
        CellType::Intersection if is_peak => COST_INTERSECTION_PEAK,
        CellType::Intersection => COST_INTERSECTION_OFF_PEAK,
        _ => COST_DEFAULT,
    }
}

/// The active cost bucket; a graph is built for exactly one regime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CostRegime {
    OffPeak,
    Peak,
}

impl CostRegime {
    /// Regime for a validated hour of day
    pub fn for_hour(hour: u8) -> Result<Self> {
        if hour > 23 {
            return Err(GridError::InvalidHour(hour));
        }
        Ok(Self::from_peak(is_peak_hour(hour)))
    }

    pub fn from_peak(is_peak: bool) -> Self {
        if is_peak {
            CostRegime::Peak
        } else {
            CostRegime::OffPeak
        }
    }

    pub fn is_peak(&self) -> bool {
        matches!(self, CostRegime::Peak)
    }

    /// Weight of moving into `target` under this regime
    pub fn weight(&self, target: CellType) -> u32 {
        weight(target, self.is_peak())
    }
}
