use serde::{Deserialize, Serialize};

/// Fixed index-to-angle mapping for `positions` evenly spaced rotation steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleMapping {
    positions: u32,
}

impl AngleMapping {
    pub const DEFAULT_POSITIONS: u32 = 16;

    /// Zero positions is clamped to one so the step stays finite.
    pub fn new(positions: u32) -> Self {
        Self {
            positions: positions.max(1),
        }
    }

    pub fn positions(&self) -> u32 {
        self.positions
    }

    /// Degrees between adjacent positions.
    pub fn step_deg(&self) -> f64 {
        360.0 / self.positions as f64
    }

    /// Indices past the last position are not wrapped.
    pub fn angle_deg(&self, index: u32) -> f64 {
        index as f64 * self.step_deg()
    }
}

impl Default for AngleMapping {
    fn default() -> Self {
        Self::new(Self::DEFAULT_POSITIONS)
    }
}
