/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::*;
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};
use std::io::{ErrorKind, Read, Write};

/// An adapter from [`Read`] and [`Write`] to [`ByteRead`] and [`ByteWrite`],
/// respectively.
///
/// Instances of this struct can be created using [`ByteAdapter::new`]. They
/// turn every standard source or destination of bytes (such as
/// [`std::fs::File`], [`std::io::BufReader`], sockets, etc.) into a byte
/// source or sink for [`BitReader`](crate::impls::BitReader) and
/// [`BitWriter`](crate::impls::BitWriter).
///
/// Reads interrupted by [`ErrorKind::Interrupted`] are retried; all other
/// errors are returned. Writes use [`Write::write_all`], so partial writes of
/// the backend are completed before returning.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct ByteAdapter<B> {
    backend: B,
}

impl<B> ByteAdapter<B> {
    /// Create a new ByteAdapter
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn get_ref(&self) -> &B {
        &self.backend
    }

    pub fn into_inner(self) -> B {
        self.backend
    }
}

impl<B: Read> ByteRead for ByteAdapter<B> {
    type Error = std::io::Error;

    #[inline]
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, std::io::Error> {
        loop {
            match self.backend.read(buf) {
                Err(e) if e.kind() == ErrorKind::Interrupted => {
                    log::trace!("Read interrupted, retrying");
                }
                res => return res,
            }
        }
    }
}

impl<B: Write> ByteWrite for ByteAdapter<B> {
    type Error = std::io::Error;

    #[inline(always)]
    fn write_byte(&mut self, byte: u8) -> Result<(), std::io::Error> {
        self.backend.write_all(&[byte])
    }

    #[inline(always)]
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), std::io::Error> {
        self.backend.write_all(bytes)
    }

    fn flush(&mut self) -> Result<(), std::io::Error> {
        self.backend.flush()
    }
}

#[cfg(test)]
mod test {
    use crate::prelude::*;

    #[test]
    fn test_byte_adapter_file() {
        let path = std::env::temp_dir().join("test_msb_bitstream_byte_adapter");
        {
            let file = std::fs::File::create(&path).unwrap();
            let mut writer = BitWriter::with_capacity(ByteAdapter::new(file), 7);
            for i in 0..1000_u64 {
                writer.write_bits(i, 10).unwrap();
                writer.write_bit(i % 3 == 0).unwrap();
            }
            writer.flush().unwrap();
        }
        {
            let mut reader = BitReader::new(ByteAdapter::new(std::fs::File::open(&path).unwrap()));
            for i in 0..1000_u64 {
                assert_eq!(reader.read_bits(10).unwrap(), i);
                assert_eq!(reader.read_bit().unwrap(), i % 3 == 0);
            }
            // 11000 bits leave 0 bits of padding
            assert!(matches!(reader.read_bit(), Err(ReadError::UnexpectedEof)));
        }
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_byte_adapter_cursor() {
        let mut adapter = ByteAdapter::new(std::io::Cursor::new(Vec::<u8>::new()));
        adapter.write_byte(0xa5).unwrap();
        adapter.write_bytes(&[1, 2, 3]).unwrap();
        let data = adapter.into_inner().into_inner();
        assert_eq!(data, [0xa5, 1, 2, 3]);

        let mut adapter = ByteAdapter::new(&data[..]);
        let mut buf = [0; 3];
        assert_eq!(adapter.read_bytes(&mut buf).unwrap(), 3);
        assert_eq!(adapter.read_bytes(&mut buf).unwrap(), 1);
        assert_eq!(adapter.read_bytes(&mut buf).unwrap(), 0);
    }
}
