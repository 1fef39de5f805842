/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::convert::Infallible;

use crate::prelude::*;
use arbitrary::Arbitrary;

#[derive(Arbitrary, Debug, Clone)]
pub struct FuzzCase {
    /// Capacity of the writer buffer; zero selects an unbuffered writer.
    buffer_size: u8,
    /// Maximum number of bytes returned by a read of the source; zero means
    /// no limit.
    read_chunk: u8,
    pad_ones: bool,
    commands: Vec<RandomCommand>,
}

#[derive(Arbitrary, Debug, Clone)]
pub enum RandomCommand {
    Zero,
    One,
    Bit(bool),
    Byte(u8),
    Bytes(Vec<u8>),
    Bits(u64, u8),
}

/// A source returning at most `chunk` bytes per read.
struct ChunkedReader<'a> {
    data: &'a [u8],
    chunk: usize,
}

impl ByteRead for ChunkedReader<'_> {
    type Error = Infallible;

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let len = buf.len().min(self.chunk).min(self.data.len());
        buf[..len].copy_from_slice(&self.data[..len]);
        self.data = &self.data[len..];
        Ok(len)
    }
}

#[inline(always)]
fn mask(n: usize) -> u64 {
    if n == 64 { u64::MAX } else { (1 << n) - 1 }
}

/// Write the commands, check that the output matches writing the same bits
/// one at a time, and read everything back.
pub fn harness(data: FuzzCase) {
    let backend = MemByteWriterVec::new(Vec::<u8>::new());
    let mut writer = if data.buffer_size == 0 {
        BitWriter::unbuffered(backend)
    } else {
        BitWriter::with_capacity(backend, data.buffer_size as usize)
    };
    let mut reference = BitWriter::unbuffered(MemByteWriterVec::new(Vec::<u8>::new()));
    let mut total_bits = 0_usize;

    for command in &data.commands {
        match command {
            RandomCommand::Zero => {
                writer.write_zero().unwrap();
                reference.write_bit(false).unwrap();
                total_bits += 1;
            }
            RandomCommand::One => {
                writer.write_one().unwrap();
                reference.write_bit(true).unwrap();
                total_bits += 1;
            }
            RandomCommand::Bit(bit) => {
                writer.write_bit(*bit).unwrap();
                reference.write_bit(*bit).unwrap();
                total_bits += 1;
            }
            RandomCommand::Byte(byte) => {
                writer.write_byte(*byte).unwrap();
                for i in (0..8).rev() {
                    reference.write_bit(byte >> i & 1 != 0).unwrap();
                }
                total_bits += 8;
            }
            RandomCommand::Bytes(bytes) => {
                writer.write_bytes(bytes).unwrap();
                for byte in bytes {
                    for i in (0..8).rev() {
                        reference.write_bit(byte >> i & 1 != 0).unwrap();
                    }
                }
                total_bits += bytes.len() * 8;
            }
            RandomCommand::Bits(value, n) => {
                let n = *n as usize % 65;
                #[cfg(feature = "checks")]
                let value = &(value & mask(n));
                writer.write_bits(*value, n).unwrap();
                for i in (0..n).rev() {
                    reference.write_bit(value >> i & 1 != 0).unwrap();
                }
                total_bits += n;
            }
        }
    }

    if data.pad_ones {
        writer.flush_ones().unwrap();
        reference.flush_ones().unwrap();
    } else {
        writer.flush().unwrap();
        reference.flush().unwrap();
    }
    // writing continues after a flush
    assert!(writer.is_aligned());

    let written = writer.into_inner().unwrap().into_inner();
    let expected = reference.into_inner().unwrap().into_inner();
    assert_eq!(written, expected);
    assert_eq!(written.len(), total_bits.div_ceil(8));

    let chunk = if data.read_chunk == 0 {
        usize::MAX
    } else {
        data.read_chunk as usize
    };
    let mut reader = BitReader::new(ChunkedReader {
        data: &written,
        chunk,
    });

    for command in &data.commands {
        match command {
            RandomCommand::Zero => assert!(!reader.read_bit().unwrap()),
            RandomCommand::One => assert!(reader.read_bit().unwrap()),
            RandomCommand::Bit(bit) => assert_eq!(reader.read_bit().unwrap(), *bit),
            RandomCommand::Byte(byte) => assert_eq!(reader.read_byte().unwrap(), *byte),
            RandomCommand::Bytes(bytes) => {
                let mut buf = vec![0; bytes.len()];
                reader.read_bytes(&mut buf).unwrap();
                assert_eq!(&buf, bytes);
            }
            RandomCommand::Bits(value, n) => {
                let n = *n as usize % 65;
                assert_eq!(reader.read_bits(n).unwrap(), value & mask(n));
            }
        }
    }

    let padding = written.len() * 8 - total_bits;
    let pad = if data.pad_ones { mask(padding) } else { 0 };
    assert_eq!(reader.read_bits(padding).unwrap(), pad);
    assert!(matches!(reader.read_bit(), Err(ReadError::UnexpectedEof)));
}
