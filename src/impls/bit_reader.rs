/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::error::Error;

use crate::traits::*;
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// The error returned by a [`BitReader`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError<E: Error + Send + Sync + 'static> {
    /// The source ended before the requested bits were available.
    #[error("Unexpected end of data")]
    UnexpectedEof,
    /// The source failed.
    #[error("Bit reader source failed: {0}")]
    Backend(#[source] E),
}

/// An implementation of [`BitRead`] on a [`ByteRead`].
///
/// Bits are read most significant first, mirroring
/// [`BitWriter`](crate::impls::BitWriter). The reader keeps at most one
/// partially consumed byte; all other bytes are fetched from the source on
/// demand, so no data beyond what is needed is ever consumed.
///
/// The end of the source is reported as [`ReadError::UnexpectedEof`]; an
/// error of the source is returned as [`ReadError::Backend`]. Errors are not
/// stored: the reader can be used again after a failed call, but since
/// [`read_bytes`](BitRead::read_bytes) and [`read_bits`](BitRead::read_bits)
/// might have consumed part of the source before failing, the position in
/// the stream is unspecified.
///
/// # Example
/// ```
/// use msb_bitstream::prelude::*;
///
/// let mut reader = BitReader::new(MemByteReader::new([0b1011_0000_u8, 0xff]));
/// assert!(reader.read_bit().unwrap());
/// assert_eq!(reader.read_bits(3).unwrap(), 0b011);
/// assert_eq!(reader.read_byte().unwrap(), 0b0000_1111);
/// assert_eq!(reader.read_bits(4).unwrap(), 0b1111);
/// assert!(matches!(reader.read_bit(), Err(ReadError::UnexpectedEof)));
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct BitReader<RD> {
    backend: RD,
    /// The last byte fetched, shifted so that its unread bits are the
    /// highest ones; the other bits are zero.
    pending: u8,
    /// Number of unread bits in `pending`, in [0..7].
    pending_bits: u32,
}

impl<RD> BitReader<RD> {
    /// Create a new [`BitReader`] on a [`ByteRead`].
    pub fn new(backend: RD) -> Self {
        Self {
            backend,
            pending: 0,
            pending_bits: 0,
        }
    }

    /// Return whether the reader is at a byte boundary.
    #[inline(always)]
    pub fn is_aligned(&self) -> bool {
        self.pending_bits == 0
    }

    pub fn get_ref(&self) -> &RD {
        &self.backend
    }

    /// Return the source. Bits of a partially read byte are lost.
    pub fn into_inner(self) -> RD {
        self.backend
    }
}

impl<RD: ByteRead> BitReader<RD> {
    /// Fetch the next byte of the source.
    #[inline]
    fn fetch(&mut self) -> Result<u8, ReadError<RD::Error>> {
        let mut byte = [0];
        match self.backend.read_bytes(&mut byte) {
            Ok(0) => Err(ReadError::UnexpectedEof),
            Ok(_) => Ok(byte[0]),
            Err(err) => Err(ReadError::Backend(err)),
        }
    }
}

impl<RD: ByteRead> BitRead for BitReader<RD> {
    type Error = ReadError<RD::Error>;

    #[inline]
    fn read_bit(&mut self) -> Result<bool, Self::Error> {
        if self.pending_bits > 0 {
            let bit = self.pending & 0x80 != 0;
            self.pending <<= 1;
            self.pending_bits -= 1;
            return Ok(bit);
        }
        let byte = self.fetch()?;
        self.pending = byte << 1;
        self.pending_bits = 7;
        Ok(byte & 0x80 != 0)
    }

    #[inline]
    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        let byte = self.fetch()?;
        if self.is_aligned() {
            return Ok(byte);
        }
        let res = self.pending | byte >> self.pending_bits;
        self.pending = byte << (8 - self.pending_bits);
        Ok(res)
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.backend.read_bytes(&mut buf[filled..]) {
                Ok(0) => return Err(ReadError::UnexpectedEof),
                Ok(n) => filled += n,
                Err(err) => return Err(ReadError::Backend(err)),
            }
        }

        if self.is_aligned() {
            return Ok(());
        }

        // Shift the whole buffer right by the number of pending bits,
        // carrying the low bits of each byte into the next one.
        let shift = self.pending_bits;
        let mut carry = self.pending;
        for byte in buf.iter_mut() {
            let fetched = *byte;
            *byte = carry | fetched >> shift;
            carry = fetched << (8 - shift);
        }
        self.pending = carry;
        Ok(())
    }

    fn read_bits(&mut self, n: usize) -> Result<u64, Self::Error> {
        assert!(n <= 64, "The number of bits to read must be in [0..64], got {n}");

        let mut res = 0;
        let whole_bytes = n / 8;
        if whole_bytes > 0 {
            let mut buf = [0; 8];
            self.read_bytes(&mut buf[..whole_bytes])?;
            for &byte in &buf[..whole_bytes] {
                res = (res << 8) | byte as u64;
            }
        }
        for _ in 0..n % 8 {
            res = (res << 1) | self.read_bit()? as u64;
        }
        Ok(res)
    }
}
