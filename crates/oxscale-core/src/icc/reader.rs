//! Bounds-checked big-endian field access

use std::ops::Range;

use super::error::IccError;

/// Read-only view over ICC data
///
/// Every accessor returns [`IccError::OutOfRange`] instead of panicking
/// when the field would extend past the end of the buffer.
#[derive(Debug, Clone, Copy)]
pub struct IccReader<'a> {
    data: &'a [u8],
}

impl<'a> IccReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn array<const N: usize>(&self, offset: usize) -> Result<[u8; N], IccError> {
        offset
            .checked_add(N)
            .and_then(|end| self.data.get(offset..end))
            .and_then(|b| b.try_into().ok())
            .ok_or(IccError::OutOfRange {
                offset,
                len: self.data.len(),
            })
    }

    pub fn u8_at(&self, offset: usize) -> Result<u8, IccError> {
        self.array::<1>(offset).map(|b| b[0])
    }

    pub fn u16_at(&self, offset: usize) -> Result<u16, IccError> {
        self.array(offset).map(u16::from_be_bytes)
    }

    pub fn u32_at(&self, offset: usize) -> Result<u32, IccError> {
        self.array(offset).map(u32::from_be_bytes)
    }

    pub fn i32_at(&self, offset: usize) -> Result<i32, IccError> {
        self.array(offset).map(i32::from_be_bytes)
    }

    /// Sub-slice, checked
    pub fn bytes(&self, range: Range<usize>) -> Result<&'a [u8], IccError> {
        let offset = range.start;
        self.data.get(range).ok_or(IccError::OutOfRange {
            offset,
            len: self.data.len(),
        })
    }
}
