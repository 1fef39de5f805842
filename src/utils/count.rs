/*
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::*;

/// Wrapping struct that keep tracks of written bits. Optionally,
/// logs at debug level information about methods called.
///
/// Padding bits written by [`flush`](BitWrite::flush) and
/// [`flush_ones`](BitWrite::flush_ones) are not counted.
#[derive(Debug)]
pub struct CountBitWriter<BW: BitWrite, const PRINT: bool = false> {
    bit_write: BW,
    /// The number of bits written so far on the underlying [`BitWrite`].
    pub bits_written: usize,
}

impl<BW: BitWrite, const PRINT: bool> CountBitWriter<BW, PRINT> {
    pub fn new(bit_write: BW) -> Self {
        Self {
            bit_write,
            bits_written: 0,
        }
    }

    pub fn into_inner(self) -> BW {
        self.bit_write
    }

    #[inline(always)]
    fn count(&mut self, n_bits: usize) {
        self.bits_written += n_bits;
    }
}

impl<BW: BitWrite, const PRINT: bool> BitWrite for CountBitWriter<BW, PRINT> {
    type Error = BW::Error;

    fn write_zero(&mut self) -> Result<(), Self::Error> {
        self.bit_write.write_zero()?;
        self.count(1);
        if PRINT {
            log::debug!("write_zero() (total = {})", self.bits_written);
        }
        Ok(())
    }

    fn write_one(&mut self) -> Result<(), Self::Error> {
        self.bit_write.write_one()?;
        self.count(1);
        if PRINT {
            log::debug!("write_one() (total = {})", self.bits_written);
        }
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.bit_write.write_byte(byte)?;
        self.count(8);
        if PRINT {
            log::debug!("write_byte({:#04x}) (total = {})", byte, self.bits_written);
        }
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.bit_write.write_bytes(bytes)?;
        self.count(bytes.len() * 8);
        if PRINT {
            log::debug!(
                "write_bytes([{} bytes]) (total = {})",
                bytes.len(),
                self.bits_written
            );
        }
        Ok(())
    }

    fn write_bits(&mut self, value: u64, n_bits: usize) -> Result<(), Self::Error> {
        self.bit_write.write_bits(value, n_bits)?;
        self.count(n_bits);
        if PRINT {
            log::debug!(
                "write_bits({:#016x}, {}) (total = {})",
                value,
                n_bits,
                self.bits_written
            );
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if PRINT {
            log::debug!("flush() (total = {})", self.bits_written);
        }
        self.bit_write.flush()
    }

    fn flush_ones(&mut self) -> Result<(), Self::Error> {
        if PRINT {
            log::debug!("flush_ones() (total = {})", self.bits_written);
        }
        self.bit_write.flush_ones()
    }
}

/// Wrapping struct that keep tracks of read bits. Optionally,
/// logs at debug level information about methods called.
#[derive(Debug)]
pub struct CountBitReader<BR: BitRead, const PRINT: bool = false> {
    bit_read: BR,
    /// The number of bits read so far from the underlying [`BitRead`].
    pub bits_read: usize,
}

impl<BR: BitRead, const PRINT: bool> CountBitReader<BR, PRINT> {
    pub fn new(bit_read: BR) -> Self {
        Self {
            bit_read,
            bits_read: 0,
        }
    }

    pub fn into_inner(self) -> BR {
        self.bit_read
    }
}

impl<BR: BitRead, const PRINT: bool> BitRead for CountBitReader<BR, PRINT> {
    type Error = BR::Error;

    fn read_bit(&mut self) -> Result<bool, Self::Error> {
        self.bit_read.read_bit().map(|x| {
            self.bits_read += 1;
            if PRINT {
                log::debug!("read_bit() = {} (total = {})", x, self.bits_read);
            }
            x
        })
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        self.bit_read.read_byte().map(|x| {
            self.bits_read += 8;
            if PRINT {
                log::debug!("read_byte() = {:#04x} (total = {})", x, self.bits_read);
            }
            x
        })
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.bit_read.read_bytes(buf)?;
        self.bits_read += buf.len() * 8;
        if PRINT {
            log::debug!(
                "read_bytes([{} bytes]) (total = {})",
                buf.len(),
                self.bits_read
            );
        }
        Ok(())
    }

    fn read_bits(&mut self, n_bits: usize) -> Result<u64, Self::Error> {
        self.bit_read.read_bits(n_bits).map(|x| {
            self.bits_read += n_bits;
            if PRINT {
                log::debug!(
                    "read_bits({}) = {:#016x} (total = {})",
                    n_bits,
                    x,
                    self.bits_read
                );
            }
            x
        })
    }
}

#[cfg(test)]
#[test]
fn test_count() -> Result<(), Box<dyn std::error::Error>> {
    use crate::prelude::*;
    let bit_write = BitWriter::new(MemByteWriterVec::new(Vec::<u8>::new()));
    let mut count_bit_write = CountBitWriter::<_, true>::new(bit_write);

    count_bit_write.write_one()?;
    assert_eq!(count_bit_write.bits_written, 1);
    count_bit_write.write_bits(1, 20)?;
    assert_eq!(count_bit_write.bits_written, 21);
    count_bit_write.write_byte(0xaa)?;
    assert_eq!(count_bit_write.bits_written, 29);
    count_bit_write.write_bytes(b"abc")?;
    assert_eq!(count_bit_write.bits_written, 53);
    count_bit_write.write_bits(1, 33)?;
    assert_eq!(count_bit_write.bits_written, 86);
    count_bit_write.flush()?;
    assert_eq!(count_bit_write.bits_written, 86);

    let buffer = count_bit_write.into_inner().into_inner()?.into_inner();
    assert_eq!(buffer.len(), 11);

    let bit_read = BitReader::new(MemByteReader::new(&buffer));
    let mut count_bit_read = CountBitReader::<_, true>::new(bit_read);

    assert!(count_bit_read.read_bit()?);
    assert_eq!(count_bit_read.bits_read, 1);
    assert_eq!(count_bit_read.read_bits(20)?, 1);
    assert_eq!(count_bit_read.bits_read, 21);
    assert_eq!(count_bit_read.read_byte()?, 0xaa);
    assert_eq!(count_bit_read.bits_read, 29);
    let mut buf = [0; 3];
    count_bit_read.read_bytes(&mut buf)?;
    assert_eq!(&buf, b"abc");
    assert_eq!(count_bit_read.bits_read, 53);
    assert_eq!(count_bit_read.read_bits(33)?, 1);
    assert_eq!(count_bit_read.bits_read, 86);
    // padding
    assert_eq!(count_bit_read.read_bits(2)?, 0);
    assert!(count_bit_read.read_bit().is_err());
    assert_eq!(count_bit_read.bits_read, 88);

    Ok(())
}
