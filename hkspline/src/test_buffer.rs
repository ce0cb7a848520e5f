#![allow(dead_code)]

use crate::Endian;
use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Writes animation bytes the way the decoder expects to read them.
pub(crate) struct TestBuffer {
    pub(crate) bytes: Vec<u8>,
    endian: Endian,
}

impl TestBuffer {
    pub(crate) fn new(endian: Endian) -> Self {
        Self {
            bytes: Vec::new(),
            endian,
        }
    }

    pub(crate) fn le() -> Self {
        Self::new(Endian::Little)
    }

    pub(crate) fn be() -> Self {
        Self::new(Endian::Big)
    }

    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn u8(&mut self, v: u8) -> &mut Self {
        self.bytes.push(v);
        self
    }

    pub(crate) fn u8s(&mut self, v: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(v);
        self
    }

    pub(crate) fn u16(&mut self, v: u16) -> &mut Self {
        let mut b = [0u8; 2];
        match self.endian {
            Endian::Little => LittleEndian::write_u16(&mut b, v),
            Endian::Big => BigEndian::write_u16(&mut b, v),
        }
        self.u8s(&b)
    }

    pub(crate) fn i16(&mut self, v: i16) -> &mut Self {
        self.u16(v as u16)
    }

    pub(crate) fn u32(&mut self, v: u32) -> &mut Self {
        let mut b = [0u8; 4];
        match self.endian {
            Endian::Little => LittleEndian::write_u32(&mut b, v),
            Endian::Big => BigEndian::write_u32(&mut b, v),
        }
        self.u8s(&b)
    }

    pub(crate) fn u64(&mut self, v: u64) -> &mut Self {
        let mut b = [0u8; 8];
        match self.endian {
            Endian::Little => LittleEndian::write_u64(&mut b, v),
            Endian::Big => BigEndian::write_u64(&mut b, v),
        }
        self.u8s(&b)
    }

    pub(crate) fn f32(&mut self, v: f32) -> &mut Self {
        self.u32(v.to_bits())
    }

    pub(crate) fn pad(&mut self, align: usize) -> &mut Self {
        while self.bytes.len() % align != 0 {
            self.bytes.push(0);
        }
        self
    }

    pub(crate) fn finish(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}
