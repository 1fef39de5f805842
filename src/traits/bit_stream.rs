/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::error::Error;

/// The error returned by the bit copy methods [`BitRead::copy_to`] and
/// [`BitWrite::copy_from`].
///
/// It can be a read or a write error, depending on which stream (source or
/// destination) generated the error.
#[derive(thiserror::Error, Debug, Clone)]
pub enum CopyError<RE: Error + Send + Sync + 'static, WE: Error + Send + Sync + 'static> {
    #[error("Read error while copying: {0}")]
    ReadError(#[source] RE),
    #[error("Write error while copying: {0}")]
    WriteError(#[source] WE),
}

/// Sequential, streaming bit-by-bit reads, most significant bit first.
///
/// Please see the documentation of the [`impls`](crate::impls) module for
/// the available implementations.
pub trait BitRead {
    type Error: Error + Send + Sync + 'static;

    /// Read a single bit.
    fn read_bit(&mut self) -> Result<bool, Self::Error>;

    /// Read eight bits as a byte, the first bit read being the most
    /// significant one.
    fn read_byte(&mut self) -> Result<u8, Self::Error>;

    /// Fill `buf` completely, each byte as by [`read_byte`](BitRead::read_byte).
    ///
    /// Either the whole buffer is filled or an error is returned; in the
    /// latter case the content of `buf` is unspecified.
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Read `n` bits and return them in the lowest bits, the first bit
    /// read being the most significant one.
    ///
    /// Implementors should panic if `n` is greater than 64.
    fn read_bits(&mut self, n: usize) -> Result<u64, Self::Error>;

    /// Copy `n` bits from this stream to `bit_write`.
    fn copy_to<W: BitWrite>(
        &mut self,
        bit_write: &mut W,
        mut n: u64,
    ) -> Result<(), CopyError<Self::Error, W::Error>> {
        while n > 0 {
            let to_read = core::cmp::min(n, 64) as usize;
            let read = self.read_bits(to_read).map_err(CopyError::ReadError)?;
            bit_write
                .write_bits(read, to_read)
                .map_err(CopyError::WriteError)?;
            n -= to_read as u64;
        }
        Ok(())
    }
}

/// Sequential, streaming bit-by-bit writes, most significant bit first.
pub trait BitWrite {
    type Error: Error + Send + Sync + 'static;

    /// Write a zero bit.
    fn write_zero(&mut self) -> Result<(), Self::Error>;

    /// Write a one bit.
    fn write_one(&mut self) -> Result<(), Self::Error>;

    /// Write a single bit.
    #[inline]
    fn write_bit(&mut self, bit: bool) -> Result<(), Self::Error> {
        if bit {
            self.write_one()
        } else {
            self.write_zero()
        }
    }

    /// Write the eight bits of `byte`, most significant bit first.
    ///
    /// This must be equivalent to eight calls to [`write_bit`](BitWrite::write_bit).
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Write all of `bytes`, each as by [`write_byte`](BitWrite::write_byte).
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Write the lowest `n` bits of `value`, the most significant of them first.
    ///
    /// Implementors should panic if `n` is greater than 64. The bits of
    /// `value` above `n` are ignored, but if the feature `checks` is enabled
    /// implementors should panic if they are not zero.
    fn write_bits(&mut self, value: u64, n: usize) -> Result<(), Self::Error>;

    /// Pad the current byte with zeros and push all pending data to the
    /// underlying sink.
    ///
    /// The stream can be written to again afterwards.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Pad the current byte with ones and push all pending data to the
    /// underlying sink.
    fn flush_ones(&mut self) -> Result<(), Self::Error>;

    /// Copy `n` bits from `bit_read` to this stream.
    fn copy_from<R: BitRead>(
        &mut self,
        bit_read: &mut R,
        mut n: u64,
    ) -> Result<(), CopyError<R::Error, Self::Error>> {
        while n > 0 {
            let to_read = core::cmp::min(n, 64) as usize;
            let read = bit_read.read_bits(to_read).map_err(CopyError::ReadError)?;
            self.write_bits(read, to_read)
                .map_err(CopyError::WriteError)?;
            n -= to_read as u64;
        }
        Ok(())
    }
}
