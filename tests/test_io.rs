/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::io::{self, ErrorKind, Read, Write};

use msb_bitstream::prelude::*;

/// A writer accepting `limit` bytes and failing afterwards.
struct Failing {
    data: Vec<u8>,
    limit: usize,
    calls: usize,
}

impl Failing {
    fn new(limit: usize) -> Self {
        Self {
            data: vec![],
            limit,
            calls: 0,
        }
    }
}

impl Write for Failing {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.calls += 1;
        let len = buf.len().min(self.limit - self.data.len());
        if len == 0 && !buf.is_empty() {
            return Err(io::Error::new(ErrorKind::StorageFull, "sink is full"));
        }
        self.data.extend_from_slice(&buf[..len]);
        Ok(len)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.calls += 1;
        Ok(())
    }
}

/// A reader returning one byte per call, interrupting every other call.
struct Trickle<'a> {
    data: &'a [u8],
    interrupt: bool,
}

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.interrupt = !self.interrupt;
        if self.interrupt {
            return Err(ErrorKind::Interrupted.into());
        }
        if buf.is_empty() || self.data.is_empty() {
            return Ok(0);
        }
        buf[0] = self.data[0];
        self.data = &self.data[1..];
        Ok(1)
    }
}

/// A reader failing after `good` bytes.
struct Broken<'a> {
    good: &'a [u8],
}

impl Read for Broken<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.good.is_empty() {
            return Err(io::Error::other("broken source"));
        }
        self.good.read(buf)
    }
}

#[test]
fn test_sticky_buffered() {
    let mut writer = BitWriter::with_capacity(ByteAdapter::new(Failing::new(4)), 4);
    for byte in 0..3 {
        writer.write_byte(byte).unwrap();
    }
    assert_eq!(writer.get_ref().get_ref().calls, 0);
    writer.write_bits(0b1, 1).unwrap();
    // the fourth byte fills the buffer, which the sink accepts
    writer.write_bits(0x7f, 7).unwrap();
    assert_eq!(writer.get_ref().get_ref().data, [0, 1, 2, 0xff]);

    for byte in 0..3 {
        writer.write_byte(byte).unwrap();
    }
    let err = writer.write_byte(3).unwrap_err();
    assert_eq!(err.get_ref().kind(), ErrorKind::StorageFull);
    let calls = writer.get_ref().get_ref().calls;

    assert_eq!(
        writer.write_one().unwrap_err().get_ref().kind(),
        ErrorKind::StorageFull
    );
    assert!(writer.write_bytes(b"more").is_err());
    assert!(writer.write_bits(0, 64).is_err());
    assert!(writer.flush().is_err());
    assert!(writer.flush_ones().is_err());
    assert!(writer.error().is_some());
    assert_eq!(writer.get_ref().get_ref().calls, calls);
    assert!(writer.into_inner().is_err());
}

#[test]
fn test_sticky_unbuffered() {
    let mut writer = BitWriter::unbuffered(ByteAdapter::new(Failing::new(2)));
    writer.write_bytes(b"ok").unwrap();
    assert!(writer.write_bits(0b101, 3).is_ok());
    // the pending bits only reach the sink on flush
    let err = writer.flush().unwrap_err();
    assert_eq!(err.get_ref().kind(), ErrorKind::StorageFull);
    assert!(writer.write_zero().is_err());
    assert!(writer.is_aligned());
    assert_eq!(writer.get_ref().get_ref().data, b"ok");
}

#[test]
fn test_trickling_source() -> Result<(), Box<dyn std::error::Error>> {
    let data: Vec<u8> = (0..100).collect();
    let mut reader = BitReader::new(ByteAdapter::new(Trickle {
        data: &data,
        interrupt: false,
    }));
    assert_eq!(reader.read_bits(5)?, 0);
    let mut buf = [0; 50];
    reader.read_bytes(&mut buf)?;
    for (i, &byte) in buf.iter().enumerate() {
        let expected = ((i as u16) << 8 | (i as u16 + 1)) >> 3;
        assert_eq!(byte, expected as u8);
    }
    assert_eq!(reader.read_bits(3)?, 50 & 0b111);
    let mut rest = [0; 49];
    reader.read_bytes(&mut rest)?;
    assert_eq!(&rest[..], &data[51..]);
    assert!(matches!(reader.read_bit(), Err(ReadError::UnexpectedEof)));
    Ok(())
}

#[test]
fn test_source_error() {
    let data = [0xf0_u8, 0x0f];
    let mut reader = BitReader::new(ByteAdapter::new(Broken { good: &data }));
    assert_eq!(reader.read_bits(4).unwrap(), 0xf);
    let mut buf = [0; 2];
    match reader.read_bytes(&mut buf) {
        Err(ReadError::Backend(err)) => assert_eq!(err.kind(), ErrorKind::Other),
        res => panic!("unexpected result {res:?}"),
    }
    // the pending bits survive the failure
    assert_eq!(reader.read_bits(4).unwrap(), 0);
    match reader.read_bit() {
        Err(ReadError::Backend(err)) => assert_eq!(err.to_string(), "broken source"),
        res => panic!("unexpected result {res:?}"),
    }
}

#[test]
fn test_writer_over_io_write() -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = BitWriter::new(ByteAdapter::new(Vec::<u8>::new()));
    writer.write_bits(0b1_0110, 5)?;
    writer.write_bytes(b"io")?;
    writer.flush_ones()?;
    let data = writer.into_inner()?.into_inner();
    assert_eq!(data.len(), 3);

    let mut reader = BitReader::new(ByteAdapter::new(&data[..]));
    assert_eq!(reader.read_bits(5)?, 0b1_0110);
    let mut buf = [0; 2];
    reader.read_bytes(&mut buf)?;
    assert_eq!(&buf, b"io");
    assert_eq!(reader.read_bits(3)?, 0b111);
    Ok(())
}
