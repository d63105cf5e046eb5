use crate::error::{CodecError, CodecResult};
use crate::serde::ByteOrder;
use std::mem;

macro_rules! put_num {
    ($fn_name:ident, $ty:ty) => {
        pub fn $fn_name(&mut self, v: $ty) -> CodecResult<()> {
            match self.order {
                ByteOrder::LittleEndian => self.put_bytes(&v.to_le_bytes()),
                ByteOrder::BigEndian => self.put_bytes(&v.to_be_bytes()),
            }
        }
    };
}

macro_rules! get_num {
    ($get_name:ident, $peek_name:ident, $ty:ty) => {
        pub fn $get_name(&mut self) -> CodecResult<$ty> {
            let bytes = self.take(mem::size_of::<$ty>())?;
            Ok(Self::decode::<$ty>(self.order, bytes))
        }

        /// Reads without advancing. `None` if too few bytes remain.
        pub fn $peek_name(&self) -> Option<$ty> {
            let end = self.pos.checked_add(mem::size_of::<$ty>())?;
            let bytes = self.buf.get(self.pos..end)?;
            Some(Self::decode::<$ty>(self.order, bytes))
        }
    };
}

/// Write position into a fixed-capacity byte region.
///
/// Writing past the capacity fails with [`CodecError::CapacityExceeded`] and
/// leaves the bytes written so far in place.
pub struct ByteWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
    order: ByteOrder,
}

impl<'a> ByteWriter<'a> {
    pub fn new(buf: &'a mut [u8], order: ByteOrder) -> Self {
        Self { buf, pos: 0, order }
    }

    pub fn position(&self) -> usize {
        self.pos
    }
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }
    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) -> CodecResult<()> {
        let end = self
            .pos
            .checked_add(bytes.len())
            .filter(|end| *end <= self.buf.len())
            .ok_or(CodecError::CapacityExceeded {
                position: self.pos,
                requested: bytes.len(),
                capacity: self.buf.len(),
            })?;
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }

    put_num!(put_u8, u8);
    put_num!(put_u16, u16);
    put_num!(put_u32, u32);
    put_num!(put_u64, u64);
    put_num!(put_f64, f64);
}

/// Read position into an input byte region.
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
    order: ByteOrder,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8], order: ByteOrder) -> Self {
        Self { buf, pos: 0, order }
    }

    pub fn position(&self) -> usize {
        self.pos
    }
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }
    pub fn has_remaining(&self) -> bool {
        self.pos < self.buf.len()
    }
    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    pub fn take(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        let buf: &'a [u8] = self.buf;
        let bytes = self
            .pos
            .checked_add(len)
            .and_then(|end| buf.get(self.pos..end))
            .ok_or(CodecError::UnexpectedEof {
                position: self.pos,
                requested: len,
                len: buf.len(),
            })?;
        self.pos += len;
        Ok(bytes)
    }

    get_num!(get_u8, peek_u8, u8);
    get_num!(get_u16, peek_u16, u16);
    get_num!(get_u32, peek_u32, u32);
    get_num!(get_u64, peek_u64, u64);
    get_num!(get_f64, peek_f64, f64);

    fn decode<T: FromEndianBytes>(order: ByteOrder, bytes: &[u8]) -> T {
        match order {
            ByteOrder::LittleEndian => T::from_le(bytes),
            ByteOrder::BigEndian => T::from_be(bytes),
        }
    }
}

trait FromEndianBytes {
    fn from_le(bytes: &[u8]) -> Self;
    fn from_be(bytes: &[u8]) -> Self;
}

macro_rules! from_endian_bytes {
    ($($ty:ty),*) => {
        $(
            impl FromEndianBytes for $ty {
                fn from_le(bytes: &[u8]) -> Self {
                    let mut arr = [0u8; mem::size_of::<$ty>()];
                    arr.copy_from_slice(bytes);
                    <$ty>::from_le_bytes(arr)
                }
                fn from_be(bytes: &[u8]) -> Self {
                    let mut arr = [0u8; mem::size_of::<$ty>()];
                    arr.copy_from_slice(bytes);
                    <$ty>::from_be_bytes(arr)
                }
            }
        )*
    };
}
from_endian_bytes!(u8, u16, u32, u64, f64);
