/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::convert::Infallible;

use crate::traits::*;
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// An implementation of [`ByteRead`] for a slice.
///
/// Reads past the end of the slice return zero bytes, which
/// [`BitReader`](crate::impls::BitReader) reports as end of data.
///
/// # Example
/// ```
/// use msb_bitstream::prelude::*;
///
/// let data = [0x12_u8, 0x34, 0x56];
/// let mut byte_reader = MemByteReader::new(&data);
///
/// let mut buf = [0; 2];
/// assert_eq!(byte_reader.read_bytes(&mut buf).unwrap(), 2);
/// assert_eq!(buf, [0x12, 0x34]);
/// assert_eq!(byte_reader.byte_pos(), 2);
///
/// // a short read at the end of the slice
/// assert_eq!(byte_reader.read_bytes(&mut buf).unwrap(), 1);
/// assert_eq!(buf[0], 0x56);
/// assert_eq!(byte_reader.read_bytes(&mut buf).unwrap(), 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct MemByteReader<B: AsRef<[u8]>> {
    data: B,
    byte_index: usize,
}

impl<B: AsRef<[u8]>> MemByteReader<B> {
    /// Create a new [`MemByteReader`] from a slice of data
    #[must_use]
    pub fn new(data: B) -> Self {
        Self {
            data,
            byte_index: 0,
        }
    }

    /// Return the number of bytes read so far.
    #[inline(always)]
    pub fn byte_pos(&self) -> usize {
        self.byte_index
    }

    pub fn into_inner(self) -> B {
        self.data
    }
}

impl<B: AsRef<[u8]>> ByteRead for MemByteReader<B> {
    type Error = Infallible;

    #[inline]
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let remaining = &self.data.as_ref()[self.byte_index..];
        let len = remaining.len().min(buf.len());
        buf[..len].copy_from_slice(&remaining[..len]);
        self.byte_index += len;
        Ok(len)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_read_to_end() {
        let data = b"Hello World!";
        let mut reader = MemByteReader::new(data);
        let mut buf = [0; 5];
        let mut out = vec![];
        loop {
            let n = reader.read_bytes(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        assert_eq!(out, data);
        assert_eq!(reader.byte_pos(), data.len());
    }

    #[test]
    fn test_empty_buf() {
        let mut reader = MemByteReader::new([1_u8, 2]);
        assert_eq!(reader.read_bytes(&mut []).unwrap(), 0);
        assert_eq!(reader.byte_pos(), 0);
    }
}
