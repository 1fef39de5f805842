/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::error::Error;

/// Sequential, streaming byte reads.
///
/// This is the source consumed by [`BitReader`](crate::impls::BitReader).
pub trait ByteRead {
    type Error: Error + Send + Sync + 'static;

    /// Read at most `buf.len()` bytes into `buf` and return how many bytes
    /// were read.
    ///
    /// Returning fewer bytes than requested is not an error; callers that
    /// need a full buffer must call again. Returning zero bytes for a
    /// nonempty `buf` signals the end of the data.
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Sequential, streaming byte writes.
///
/// This is the sink fed by [`BitWriter`](crate::impls::BitWriter).
pub trait ByteWrite {
    type Error: Error + Send + Sync + 'static;

    /// Write a single byte.
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Write all of `bytes`.
    ///
    /// Implementations must either accept every byte or return an error:
    /// partial acceptance has to be retried internally.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Flush the sink.
    fn flush(&mut self) -> Result<(), Self::Error>;
}
