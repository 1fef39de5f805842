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

/// Error of the in-memory sinks.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemError {
    /// The underlying memory cannot hold the bytes being written.
    #[error("No space left for {requested} byte(s) at byte position {byte_pos}")]
    Full { byte_pos: usize, requested: usize },
}

/// An implementation of [`ByteWrite`] for a mutable slice of memory.
///
/// A write that does not fit in the remaining space fails with
/// [`MemError::Full`] and leaves the slice untouched.
///
/// # Example
/// ```
/// use msb_bitstream::prelude::*;
///
/// let mut bytes = [0_u8; 3];
/// let mut byte_writer = MemByteWriter::new(&mut bytes);
///
/// assert!(byte_writer.write_byte(0x12).is_ok());
/// assert!(byte_writer.write_bytes(&[0x34, 0x56]).is_ok());
/// assert_eq!(byte_writer.byte_pos(), 3);
/// assert!(byte_writer.write_byte(0x78).is_err());
/// assert_eq!(bytes, [0x12, 0x34, 0x56]);
/// ```
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct MemByteWriter<B: AsMut<[u8]>> {
    data: B,
    byte_index: usize,
}

impl<B: AsMut<[u8]>> MemByteWriter<B> {
    /// Create a new [`MemByteWriter`] writing from the start of `data`.
    #[must_use]
    pub fn new(data: B) -> Self {
        Self {
            data,
            byte_index: 0,
        }
    }

    /// Return the number of bytes written so far.
    #[inline(always)]
    pub fn byte_pos(&self) -> usize {
        self.byte_index
    }

    pub fn into_inner(self) -> B {
        self.data
    }
}

impl<B: AsMut<[u8]>> ByteWrite for MemByteWriter<B> {
    type Error = MemError;

    #[inline]
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        match self.data.as_mut().get_mut(self.byte_index) {
            Some(byte_ref) => {
                *byte_ref = byte;
                self.byte_index += 1;
                Ok(())
            }
            None => Err(MemError::Full {
                byte_pos: self.byte_index,
                requested: 1,
            }),
        }
    }

    #[inline]
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        let end = self.byte_index + bytes.len();
        match self.data.as_mut().get_mut(self.byte_index..end) {
            Some(dst) => {
                dst.copy_from_slice(bytes);
                self.byte_index = end;
                Ok(())
            }
            None => Err(MemError::Full {
                byte_pos: self.byte_index,
                requested: bytes.len(),
            }),
        }
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// An implementation of [`ByteWrite`] appending to a [`Vec<u8>`].
///
/// Differently from [`MemByteWriter`], this sink never runs out of space.
///
/// # Example
/// ```
/// use msb_bitstream::prelude::*;
///
/// let mut byte_writer = MemByteWriterVec::new(Vec::<u8>::new());
/// byte_writer.write_byte(b'a').unwrap();
/// byte_writer.write_bytes(b"bc").unwrap();
/// assert_eq!(byte_writer.len(), 3);
/// assert_eq!(byte_writer.into_inner(), b"abc");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct MemByteWriterVec<B: AsMut<Vec<u8>>> {
    data: B,
}

impl<B: AsMut<Vec<u8>>> MemByteWriterVec<B> {
    /// Create a new [`MemByteWriterVec`] appending to `data`.
    #[must_use]
    pub fn new(data: B) -> Self {
        Self { data }
    }

    pub fn into_inner(self) -> B {
        self.data
    }
}

impl<B: AsMut<Vec<u8>> + AsRef<Vec<u8>>> MemByteWriterVec<B> {
    pub fn len(&self) -> usize {
        self.data.as_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<B: AsMut<Vec<u8>>> ByteWrite for MemByteWriterVec<B> {
    type Error = Infallible;

    #[inline(always)]
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.data.as_mut().push(byte);
        Ok(())
    }

    #[inline(always)]
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.data.as_mut().extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
