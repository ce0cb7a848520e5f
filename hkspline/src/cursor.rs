//! Sequential reader over an in-memory animation buffer.
//!
//! All alignment is relative to the start of the slice the cursor was built from.

use crate::Error;
use byteorder::{BigEndian, ByteOrder, LittleEndian};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Endian {
    #[default]
    Little,
    Big,
}

impl Endian {
    pub fn from_big_endian_flag(is_big_endian: bool) -> Self {
        if is_big_endian { Self::Big } else { Self::Little }
    }
}

macro_rules! read_fixed {
    ($name:ident, $ty:ty, $size:expr, $read:ident) => {
        pub fn $name(&mut self) -> Result<$ty, Error> {
            let bytes = self.take($size)?;
            Ok(match self.endian {
                Endian::Little => LittleEndian::$read(bytes),
                Endian::Big => BigEndian::$read(bytes),
            })
        }
    };
}

#[derive(Clone, Debug)]
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    position: usize,
    endian: Endian,
}

impl<'a> ByteCursor<'a> {
    pub fn new(bytes: &'a [u8], endian: Endian) -> Self {
        Self {
            bytes,
            position: 0,
            endian,
        }
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves the cursor. Positions past the end are allowed; the next read fails.
    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.position)
    }

    /// Advances to the next multiple of `align`. Skipped bytes are not inspected.
    pub fn pad(&mut self, align: usize) {
        if align > 1 {
            let rem = self.position % align;
            if rem != 0 {
                self.position += align - rem;
            }
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], Error> {
        if self.remaining() < n {
            return Err(Error::BufferUnderrun {
                offset: self.position,
                needed: n,
                len: self.bytes.len(),
            });
        }
        let out = &self.bytes[self.position..self.position + n];
        self.position += n;
        Ok(out)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], Error> {
        self.take(n)
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, Error> {
        Ok(self.read_u8()? as i8)
    }

    read_fixed!(read_u16, u16, 2, read_u16);
    read_fixed!(read_i16, i16, 2, read_i16);
    read_fixed!(read_u32, u32, 4, read_u32);
    read_fixed!(read_i32, i32, 4, read_i32);
    read_fixed!(read_u64, u64, 8, read_u64);
    read_fixed!(read_i64, i64, 8, read_i64);
    read_fixed!(read_f32, f32, 4, read_f32);
}
