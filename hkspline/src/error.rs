use std::fmt;
use thiserror::Error;

/// Which quantization table a rejected code was looked up in.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum QuantizationKind {
    Scalar,
    Rotation,
}

impl fmt::Display for QuantizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => f.write_str("scalar"),
            Self::Rotation => f.write_str("rotation"),
        }
    }
}

/// The transform component a flag byte belongs to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TransformGroup {
    Position,
    Rotation,
    Scale,
}

impl fmt::Display for TransformGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position => f.write_str("position"),
            Self::Rotation => f.write_str("rotation"),
            Self::Scale => f.write_str("scale"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("buffer underrun: need {needed} bytes at offset {offset}, buffer is {len} bytes")]
    BufferUnderrun {
        offset: usize,
        needed: usize,
        len: usize,
    },

    #[error("unsupported {kind} quantization code {code}")]
    UnsupportedQuantization { kind: QuantizationKind, code: u8 },

    #[error("invalid {group} flag combination {flags:#010b}")]
    InvalidFlagCombination { group: TransformGroup, flags: u8 },

    #[error("invalid spline header at offset {offset}: numItems={num_items} degree={degree}")]
    InvalidSplineHeader {
        offset: usize,
        num_items: i16,
        degree: u8,
    },
}
