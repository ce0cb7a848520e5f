//! The 4-byte per-track header selecting static/spline channels and quantization.

use crate::{ByteCursor, Error, RotationQuantization, ScalarQuantization, TransformGroup};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Axis {
    X,
    Y,
    Z,
    W,
}

impl Axis {
    pub const XYZ: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub(crate) fn index(self) -> u8 {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
            Self::W => 3,
        }
    }
}

/// One group's flag byte: the low nibble marks static axes, the high nibble spline axes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChannelFlags(u8);

impl ChannelFlags {
    pub const STATIC_X: u8 = 0b0000_0001;
    pub const STATIC_Y: u8 = 0b0000_0010;
    pub const STATIC_Z: u8 = 0b0000_0100;
    pub const STATIC_W: u8 = 0b0000_1000;
    pub const SPLINE_X: u8 = 0b0001_0000;
    pub const SPLINE_Y: u8 = 0b0010_0000;
    pub const SPLINE_Z: u8 = 0b0100_0000;
    pub const SPLINE_W: u8 = 0b1000_0000;

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn is_static(self, axis: Axis) -> bool {
        self.0 & (1 << axis.index()) != 0
    }

    pub fn is_spline(self, axis: Axis) -> bool {
        self.0 & (1 << (axis.index() + 4)) != 0
    }

    pub fn static_x(self) -> bool {
        self.is_static(Axis::X)
    }

    pub fn static_y(self) -> bool {
        self.is_static(Axis::Y)
    }

    pub fn static_z(self) -> bool {
        self.is_static(Axis::Z)
    }

    pub fn static_w(self) -> bool {
        self.is_static(Axis::W)
    }

    pub fn spline_x(self) -> bool {
        self.is_spline(Axis::X)
    }

    pub fn spline_y(self) -> bool {
        self.is_spline(Axis::Y)
    }

    pub fn spline_z(self) -> bool {
        self.is_spline(Axis::Z)
    }

    pub fn spline_w(self) -> bool {
        self.is_spline(Axis::W)
    }

    pub fn any_spline_xyz(self) -> bool {
        self.0 & (Self::SPLINE_X | Self::SPLINE_Y | Self::SPLINE_Z) != 0
    }

    pub fn any_spline(self) -> bool {
        self.0 & 0xF0 != 0
    }

    pub fn any_static(self) -> bool {
        self.0 & 0x0F != 0
    }

    /// Whether the flags can be decoded without ambiguity for `group`.
    ///
    /// Vector groups must not use the W bits or mark an axis both static and spline;
    /// the rotation group is either all spline or all static.
    pub fn is_consistent(self, group: TransformGroup) -> bool {
        match group {
            TransformGroup::Position | TransformGroup::Scale => {
                let overlap = (self.0 >> 4) & self.0 & 0x0F;
                let uses_w = self.0 & (Self::STATIC_W | Self::SPLINE_W) != 0;
                overlap == 0 && !uses_w
            }
            TransformGroup::Rotation => !(self.any_spline() && self.any_static()),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TransformMask {
    quantization: u8,
    pub position: ChannelFlags,
    pub rotation: ChannelFlags,
    pub scale: ChannelFlags,
}

impl TransformMask {
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self {
            quantization: bytes[0],
            position: ChannelFlags(bytes[1]),
            rotation: ChannelFlags(bytes[2]),
            scale: ChannelFlags(bytes[3]),
        }
    }

    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, Error> {
        let quantization = cursor.read_u8()?;
        let position = cursor.read_u8()?;
        let rotation = cursor.read_u8()?;
        let scale = cursor.read_u8()?;
        Ok(Self::from_bytes([quantization, position, rotation, scale]))
    }

    /// Raw quantization selector byte.
    pub fn quantization_bits(&self) -> u8 {
        self.quantization
    }

    pub fn position_quantization(&self) -> Result<ScalarQuantization, Error> {
        ScalarQuantization::from_code(self.quantization & 0x3)
    }

    pub fn rotation_quantization(&self) -> Result<RotationQuantization, Error> {
        RotationQuantization::from_code((self.quantization >> 2) & 0xF)
    }

    pub fn scale_quantization(&self) -> Result<ScalarQuantization, Error> {
        ScalarQuantization::from_code((self.quantization >> 6) & 0x3)
    }

    pub fn flags(&self, group: TransformGroup) -> ChannelFlags {
        match group {
            TransformGroup::Position => self.position,
            TransformGroup::Rotation => self.rotation,
            TransformGroup::Scale => self.scale,
        }
    }

    /// First inconsistent group, if any.
    pub fn validate(&self) -> Result<(), Error> {
        for group in [
            TransformGroup::Position,
            TransformGroup::Rotation,
            TransformGroup::Scale,
        ] {
            let flags = self.flags(group);
            if !flags.is_consistent(group) {
                return Err(Error::InvalidFlagCombination {
                    group,
                    flags: flags.bits(),
                });
            }
        }
        Ok(())
    }
}
