//! Cursor-style little-endian byte reader.
//!
//! Every decoder reads through this cursor so that byte offsets are
//! explicit and every access is bounds-checked.  Native struct layout is
//! never used for the wire format: packing and endianness are asserted
//! here, not inherited from the host platform.

use crate::error::DecodeError;

/// Bounds-checked little-endian cursor over a raw packet.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Cursor starting at the beginning of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Cursor starting at `offset` into `data`.
    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self { data, pos: offset }
    }

    /// Current byte offset of the cursor.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let end = self.pos.checked_add(n).ok_or(DecodeError::ArrayBounds {
            offset: self.pos,
        })?;
        let Some(bytes) = self.data.get(self.pos..end) else {
            return Err(DecodeError::ArrayBounds { offset: self.pos });
        };
        self.pos = end;
        Ok(bytes)
    }

    #[inline]
    pub fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    #[inline]
    pub fn i8(&mut self) -> Result<i8, DecodeError> {
        self.u8().map(|v| v as i8)
    }

    #[inline]
    pub fn u16_le(&mut self) -> Result<u16, DecodeError> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    #[inline]
    pub fn i16_le(&mut self) -> Result<i16, DecodeError> {
        self.u16_le().map(|v| v as i16)
    }

    #[inline]
    pub fn u32_le(&mut self) -> Result<u32, DecodeError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    #[inline]
    pub fn u64_le(&mut self) -> Result<u64, DecodeError> {
        let b = self.take(8)?;
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(b);
        Ok(u64::from_le_bytes(bytes))
    }

    /// Little-endian f32; non-finite values are clamped to 0.0 so a
    /// corrupt float can never propagate NaN into live state.
    #[inline]
    pub fn f32_le(&mut self) -> Result<f32, DecodeError> {
        let b = self.take(4)?;
        let v = f32::from_le_bytes([b[0], b[1], b[2], b[3]]);
        Ok(if v.is_finite() { v } else { 0.0 })
    }

    /// Little-endian f64; non-finite values are clamped to 0.0.
    #[inline]
    pub fn f64_le(&mut self) -> Result<f64, DecodeError> {
        let b = self.take(8)?;
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(b);
        let v = f64::from_le_bytes(bytes);
        Ok(if v.is_finite() { v } else { 0.0 })
    }

    pub fn u8_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let b = self.take(N)?;
        let mut arr = [0u8; N];
        arr.copy_from_slice(b);
        Ok(arr)
    }

    pub fn u16_le_array<const N: usize>(&mut self) -> Result<[u16; N], DecodeError> {
        let mut arr = [0u16; N];
        for item in arr.iter_mut() {
            *item = self.u16_le()?;
        }
        Ok(arr)
    }

    pub fn f32_le_array<const N: usize>(&mut self) -> Result<[f32; N], DecodeError> {
        let mut arr = [0.0f32; N];
        for item in arr.iter_mut() {
            *item = self.f32_le()?;
        }
        Ok(arr)
    }

    /// UTF-8 string from a fixed-width, NUL-padded field.
    ///
    /// Invalid UTF-8 tails are dropped rather than rejected: a garbled
    /// driver name is not a reason to discard a whole packet.
    pub fn fixed_string<const N: usize>(&mut self) -> Result<String, DecodeError> {
        let raw = self.u8_array::<N>()?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(N);
        Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
    }

    pub fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
        self.take(n).map(|_| ())
    }
}
