//! Scalar and rotation quantization schemes.

use crate::{ByteCursor, Error, QuantizationKind, Quaternion};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ScalarQuantization {
    Bits8,
    Bits16,
}

impl ScalarQuantization {
    pub fn from_code(code: u8) -> Result<Self, Error> {
        match code {
            0 => Ok(Self::Bits8),
            1 => Ok(Self::Bits16),
            _ => Err(Error::UnsupportedQuantization {
                kind: QuantizationKind::Scalar,
                code,
            }),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Bits8 => 0,
            Self::Bits16 => 1,
        }
    }

    pub fn byte_count(self) -> usize {
        match self {
            Self::Bits8 => 1,
            Self::Bits16 => 2,
        }
    }

    /// Maps a raw stored integer into `[min, max]`.
    ///
    /// `raw` is truncated to the scheme's width.
    pub fn dequantize(self, raw: u16, min: f32, max: f32) -> f32 {
        let ratio = match self {
            Self::Bits8 => (raw as u8) as f32 / 255.0,
            Self::Bits16 => raw as f32 / 65535.0,
        };
        min + (max - min) * ratio
    }
}

pub fn decode_scalar(
    cursor: &mut ByteCursor<'_>,
    min: f32,
    max: f32,
    quantization: ScalarQuantization,
) -> Result<f32, Error> {
    let raw = match quantization {
        ScalarQuantization::Bits8 => cursor.read_u8()? as u16,
        ScalarQuantization::Bits16 => cursor.read_u16()?,
    };
    Ok(quantization.dequantize(raw, min, max))
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RotationQuantization {
    Polar32,
    ThreeComp40,
    ThreeComp48,
    ThreeComp24,
    Straight16,
    Uncompressed,
}

impl RotationQuantization {
    pub fn from_code(code: u8) -> Result<Self, Error> {
        Ok(match code {
            0 => Self::Polar32,
            1 => Self::ThreeComp40,
            2 => Self::ThreeComp48,
            3 => Self::ThreeComp24,
            4 => Self::Straight16,
            5 => Self::Uncompressed,
            _ => {
                return Err(Error::UnsupportedQuantization {
                    kind: QuantizationKind::Rotation,
                    code,
                });
            }
        })
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Polar32 => 0,
            Self::ThreeComp40 => 1,
            Self::ThreeComp48 => 2,
            Self::ThreeComp24 => 3,
            Self::Straight16 => 4,
            Self::Uncompressed => 5,
        }
    }

    /// Alignment the payload of this kind starts on.
    pub fn align(self) -> usize {
        match self {
            Self::Polar32 => 4,
            Self::ThreeComp40 => 1,
            Self::ThreeComp48 => 2,
            Self::ThreeComp24 => 1,
            Self::Straight16 => 2,
            Self::Uncompressed => 4,
        }
    }

    pub fn byte_count(self) -> usize {
        match self {
            Self::Polar32 => 4,
            Self::ThreeComp40 => 5,
            Self::ThreeComp48 => 6,
            Self::ThreeComp24 => 3,
            Self::Straight16 => 2,
            Self::Uncompressed => 16,
        }
    }
}

pub fn decode_rotation(
    cursor: &mut ByteCursor<'_>,
    quantization: RotationQuantization,
) -> Result<Quaternion, Error> {
    match quantization {
        RotationQuantization::Polar32 => Ok(polar32(cursor.read_u32()?)),
        RotationQuantization::ThreeComp40 => {
            // The packed value is 5 bytes wide but is fetched as a 64-bit word.
            let start = cursor.position();
            let packed = cursor.read_u64()?;
            cursor.set_position(start + 5);
            Ok(three_comp40(packed))
        }
        RotationQuantization::ThreeComp48 => {
            let x = cursor.read_i16()?;
            let y = cursor.read_i16()?;
            let z = cursor.read_i16()?;
            Ok(three_comp48(x, y, z))
        }
        RotationQuantization::ThreeComp24 | RotationQuantization::Straight16 => {
            Err(Error::UnsupportedQuantization {
                kind: QuantizationKind::Rotation,
                code: quantization.code(),
            })
        }
        RotationQuantization::Uncompressed => Ok(Quaternion::new(
            cursor.read_f32()?,
            cursor.read_f32()?,
            cursor.read_f32()?,
            cursor.read_f32()?,
        )),
    }
}

pub fn polar32(packed: u32) -> Quaternion {
    const R_MASK: u32 = (1 << 10) - 1;
    const R_FRAC: f32 = 1.0 / R_MASK as f32;
    const PHI_FRAC: f32 = FRAC_PI_2 / 511.0;

    let r = ((packed >> 18) & R_MASK) as f32 * R_FRAC;
    let r = 1.0 - r * r;

    let phi_theta = (packed & 0x3FFFF) as f32;
    let mut phi = (phi_theta as f64).sqrt().floor() as f32;
    let mut theta = 0.0f32;
    if phi > 0.0 {
        theta = FRAC_PI_4 * (phi_theta - phi * phi) / phi;
        phi *= PHI_FRAC;
    }

    let magnitude = (1.0 - r * r).sqrt() as f64;
    let (sin_phi, cos_phi) = (phi as f64).sin_cos();
    let (sin_theta, cos_theta) = (theta as f64).sin_cos();

    let mut q = Quaternion::new(
        (sin_phi * cos_theta * magnitude) as f32,
        (sin_phi * sin_theta * magnitude) as f32,
        (cos_phi * magnitude) as f32,
        r,
    );

    if packed & 0x1000_0000 != 0 {
        q.x *= -1.0;
    }
    if packed & 0x2000_0000 != 0 {
        q.y *= -1.0;
    }
    if packed & 0x4000_0000 != 0 {
        q.z *= -1.0;
    }
    if packed & 0x8000_0000 != 0 {
        q.w *= -1.0;
    }
    q
}

pub fn three_comp48(x: i16, y: i16, z: i16) -> Quaternion {
    const MASK: i32 = (1 << 15) - 1;
    const FRACTAL: f32 = 0.000043161;

    let (x, y, z) = (x as i32, y as i32, z as i32);
    let missing = (((y >> 14) & 2) | ((x >> 15) & 1)) as usize;
    let negative = (z >> 15) != 0;

    let stored = [
        ((x & MASK) - (MASK >> 1)) as f32 * FRACTAL,
        ((y & MASK) - (MASK >> 1)) as f32 * FRACTAL,
        ((z & MASK) - (MASK >> 1)) as f32 * FRACTAL,
    ];
    reconstruct(stored, missing, negative)
}

/// Decodes the low 40 bits of `packed`; higher bits are ignored.
pub fn three_comp40(packed: u64) -> Quaternion {
    const MASK: u64 = (1 << 12) - 1;
    const HALF: i32 = (MASK >> 1) as i32;
    const FRACTAL: f32 = 0.000345436;

    let x = (packed & MASK) as i32 - HALF;
    let y = ((packed >> 12) & MASK) as i32 - HALF;
    let z = ((packed >> 24) & MASK) as i32 - HALF;
    let missing = ((packed >> 36) & 3) as usize;
    let negative = (packed >> 38) & 1 != 0;

    reconstruct(
        [x as f32 * FRACTAL, y as f32 * FRACTAL, z as f32 * FRACTAL],
        missing,
        negative,
    )
}

// Places the three stored components around slot `missing` and derives that slot from
// the unit-length constraint.
fn reconstruct(stored: [f32; 3], missing: usize, negative: bool) -> Quaternion {
    let mut out = [0.0f32; 4];
    for i in 0..4 {
        if i < missing {
            out[i] = stored[i];
        } else if i > missing {
            out[i] = stored[i - 1];
        }
    }

    let rest = 1.0 - stored[0] * stored[0] - stored[1] * stored[1] - stored[2] * stored[2];
    out[missing] = if rest <= 0.0 { 0.0 } else { rest.sqrt() };
    if negative {
        out[missing] *= -1.0;
    }
    Quaternion::from_array(out)
}
