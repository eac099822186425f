use core::fmt;

use thiserror::Error;

use crate::types::Coord;

/// Grid dimension violated by an out-of-range access.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The only recoverable failure of the engine: an indexed access past the
/// grid boundary. Carries the offending index, the valid length and the
/// violated axis.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("index {index} out of bounds for {axis} axis of length {len}")]
pub struct OutOfBounds {
    pub axis: Axis,
    pub index: Coord,
    pub len: Coord,
}

pub type Result<T> = core::result::Result<T, OutOfBounds>;
