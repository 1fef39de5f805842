/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::error::Error;
use std::sync::Arc;

use crate::traits::*;

/// The default capacity, in bytes, of the buffer of a [`BitWriter`].
pub const DEFAULT_BUFFER_SIZE: usize = 128;

/// The sticky error of a [`BitWriter`].
///
/// It wraps the first error returned by the underlying [`ByteWrite`]. Since
/// the same error is returned by every operation after the failing one, it is
/// reference counted and cheap to clone.
#[derive(thiserror::Error, Debug)]
#[error("Bit writer sink failed: {0}")]
pub struct WriteError<E: Error + Send + Sync + 'static>(#[source] Arc<E>);

impl<E: Error + Send + Sync + 'static> WriteError<E> {
    /// Return the error of the underlying [`ByteWrite`].
    pub fn get_ref(&self) -> &E {
        &self.0
    }
}

impl<E: Error + Send + Sync + 'static> Clone for WriteError<E> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

/// Where completed bytes go. Chosen at construction and never changed.
#[derive(Debug)]
enum Sink<WR> {
    /// Every completed byte is passed to [`ByteWrite::write_byte`].
    Direct(WR),
    /// Completed bytes are collected and passed to [`ByteWrite::write_bytes`]
    /// when `capacity` of them are available.
    Buffered {
        backend: WR,
        buffer: Vec<u8>,
        capacity: usize,
    },
}

/// An implementation of [`BitWrite`] on a [`ByteWrite`].
///
/// Bits are written most significant first: the first bit written becomes
/// the highest bit of the first byte. Bits accumulate in a pending byte, and
/// completed bytes are either pushed directly to the backend
/// ([`BitWriter::unbuffered`]) or collected in a buffer of fixed capacity
/// that is written in a single call when full ([`BitWriter::new`],
/// [`BitWriter::with_capacity`], [`BitWriter::with_buffer`]).
///
/// The last partial byte is written only by [`flush`](BitWrite::flush),
/// [`flush_ones`](BitWrite::flush_ones) or [`into_inner`](BitWriter::into_inner):
/// dropping the writer discards it, together with the content of the buffer.
///
/// The first error of the backend is sticky: it is returned by the call that
/// caused it and by all subsequent calls, which do nothing else. See
/// [`WriteError`].
///
/// # Example
/// ```
/// use msb_bitstream::prelude::*;
///
/// let mut writer = BitWriter::unbuffered(MemByteWriterVec::new(Vec::<u8>::new()));
/// writer.write_bits(0b101, 3).unwrap();
/// writer.write_byte(0xff).unwrap();
/// writer.flush_ones().unwrap();
/// assert_eq!(writer.into_inner().unwrap().into_inner(), [0b1011_1111, 0b1111_1111]);
/// ```
#[derive(Debug)]
pub struct BitWriter<WR: ByteWrite> {
    sink: Sink<WR>,
    /// The byte being assembled; its lowest `free_bits` bits are zero.
    pending: u8,
    /// Number of free bits in `pending`, in [1..8]. 8 means that no bit is
    /// pending.
    free_bits: u32,
    error: Option<WriteError<WR::Error>>,
}

impl<WR: ByteWrite> BitWriter<WR> {
    /// Create a new [`BitWriter`] with a buffer of
    /// [`DEFAULT_BUFFER_SIZE`] bytes.
    pub fn new(backend: WR) -> Self {
        Self::with_capacity(backend, DEFAULT_BUFFER_SIZE)
    }

    /// Create a new [`BitWriter`] writing to the backend every `capacity`
    /// bytes. A capacity of zero is treated as one.
    pub fn with_capacity(backend: WR, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self::from_sink(Sink::Buffered {
            backend,
            buffer: Vec::with_capacity(capacity),
            capacity,
        })
    }

    /// Create a new [`BitWriter`] using `buffer` as its buffer.
    ///
    /// The content of `buffer` is discarded, and its capacity (at least one)
    /// becomes the capacity of the writer.
    pub fn with_buffer(backend: WR, mut buffer: Vec<u8>) -> Self {
        buffer.clear();
        let capacity = buffer.capacity().max(1);
        Self::from_sink(Sink::Buffered {
            backend,
            buffer,
            capacity,
        })
    }

    /// Create a new [`BitWriter`] passing each completed byte to the
    /// backend as soon as it is available.
    pub fn unbuffered(backend: WR) -> Self {
        Self::from_sink(Sink::Direct(backend))
    }

    fn from_sink(sink: Sink<WR>) -> Self {
        Self {
            sink,
            pending: 0,
            free_bits: 8,
            error: None,
        }
    }

    /// Return whether the writer is at a byte boundary.
    #[inline(always)]
    pub fn is_aligned(&self) -> bool {
        self.free_bits == 8
    }

    /// Return the sticky error, if the backend failed.
    pub fn error(&self) -> Option<&WriteError<WR::Error>> {
        self.error.as_ref()
    }

    /// Return a reference to the backend.
    ///
    /// Bytes still pending or buffered in the writer are not visible in the
    /// backend until the next flush.
    pub fn get_ref(&self) -> &WR {
        match &self.sink {
            Sink::Direct(backend) => backend,
            Sink::Buffered { backend, .. } => backend,
        }
    }

    /// Flush the writer, padding with zeros, and return the backend.
    pub fn into_inner(mut self) -> Result<WR, WriteError<WR::Error>> {
        BitWrite::flush(&mut self)?;
        Ok(match self.sink {
            Sink::Direct(backend) => backend,
            Sink::Buffered { backend, .. } => backend,
        })
    }

    #[inline(always)]
    fn check(&self) -> Result<(), WriteError<WR::Error>> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    #[cold]
    fn fail(&mut self, err: WR::Error) -> WriteError<WR::Error> {
        log::debug!("Bit writer sink failed, discarding further writes: {err}");
        let err = WriteError(Arc::new(err));
        self.error = Some(err.clone());
        err
    }

    /// Write the content of the buffer to the backend and clear it.
    fn drain(backend: &mut WR, buffer: &mut Vec<u8>) -> Result<(), WR::Error> {
        if buffer.is_empty() {
            return Ok(());
        }
        let res = backend.write_bytes(buffer);
        buffer.clear();
        res
    }

    /// Hand a completed byte to the sink.
    #[inline]
    fn push(&mut self, byte: u8) -> Result<(), WriteError<WR::Error>> {
        let res = match &mut self.sink {
            Sink::Direct(backend) => backend.write_byte(byte),
            Sink::Buffered {
                backend,
                buffer,
                capacity,
            } => {
                buffer.push(byte);
                if buffer.len() < *capacity {
                    return Ok(());
                }
                Self::drain(backend, buffer)
            }
        };
        res.map_err(|err| self.fail(err))
    }

    /// Complete the pending byte with `pad` and flush the sink.
    fn pad_and_flush(&mut self, pad: bool) -> Result<(), WriteError<WR::Error>> {
        self.check()?;
        if !self.is_aligned() {
            let byte = if pad {
                self.pending | ((1 << self.free_bits) - 1) as u8
            } else {
                self.pending
            };
            self.pending = 0;
            self.free_bits = 8;
            self.push(byte)?;
        }
        let res = match &mut self.sink {
            Sink::Direct(backend) => backend.flush(),
            Sink::Buffered {
                backend, buffer, ..
            } => Self::drain(backend, buffer).and_then(|()| backend.flush()),
        };
        res.map_err(|err| self.fail(err))
    }
}

impl<WR: ByteWrite> BitWrite for BitWriter<WR> {
    type Error = WriteError<WR::Error>;

    #[inline]
    fn write_zero(&mut self) -> Result<(), Self::Error> {
        self.check()?;
        if self.free_bits > 1 {
            self.free_bits -= 1;
            return Ok(());
        }
        let byte = self.pending;
        self.pending = 0;
        self.free_bits = 8;
        self.push(byte)
    }

    #[inline]
    fn write_one(&mut self) -> Result<(), Self::Error> {
        self.check()?;
        if self.free_bits > 1 {
            self.free_bits -= 1;
            self.pending |= 1 << self.free_bits;
            return Ok(());
        }
        let byte = self.pending | 1;
        self.pending = 0;
        self.free_bits = 8;
        self.push(byte)
    }

    #[inline]
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.check()?;
        if self.is_aligned() {
            return self.push(byte);
        }
        // The high part completes the pending byte, the low part starts the
        // next one at the same offset.
        let completed = self.pending | byte >> (8 - self.free_bits);
        self.pending = byte << self.free_bits;
        self.push(completed)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.check()?;
        if self.is_aligned() {
            let res = match &mut self.sink {
                Sink::Direct(backend) => backend.write_bytes(bytes),
                Sink::Buffered {
                    backend, buffer, ..
                } => Self::drain(backend, buffer).and_then(|()| backend.write_bytes(bytes)),
            };
            return res.map_err(|err| self.fail(err));
        }

        let shift = self.free_bits;
        for &byte in bytes {
            let completed = self.pending | byte >> (8 - shift);
            self.pending = byte << shift;
            self.push(completed)?;
        }
        Ok(())
    }

    fn write_bits(&mut self, value: u64, n: usize) -> Result<(), Self::Error> {
        assert!(n <= 64, "The number of bits to write must be in [0..64], got {n}");

        #[cfg(feature = "checks")]
        assert!(
            n == 64 || value >> n == 0,
            "Value {value} does not fit in {n} bits"
        );

        self.check()?;
        if n == 0 {
            return Ok(());
        }

        let mut word = value << (64 - n);
        let mut n = n;
        while n >= 8 {
            self.write_byte((word >> 56) as u8)?;
            word <<= 8;
            n -= 8;
        }
        while n > 0 {
            if word >> 63 == 0 {
                self.write_zero()?;
            } else {
                self.write_one()?;
            }
            word <<= 1;
            n -= 1;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.pad_and_flush(false)
    }

    fn flush_ones(&mut self) -> Result<(), Self::Error> {
        self.pad_and_flush(true)
    }
}
