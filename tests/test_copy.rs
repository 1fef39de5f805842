/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use msb_bitstream::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_copy() -> Result<(), Box<dyn std::error::Error>> {
    for len in (0..1000).step_by(7) {
        let mut write = BitWriter::new(MemByteWriterVec::new(Vec::<u8>::new()));

        let mut r = SmallRng::seed_from_u64(0);
        for _ in 0..len {
            write.write_bits(r.random_range(0..2), 1)?;
        }

        let buffer = write.into_inner()?.into_inner();

        let mut read = BitReader::new(MemByteReader::new(buffer));

        let mut copy_write = BitWriter::new(MemByteWriterVec::new(Vec::<u8>::new()));

        read.copy_to(&mut copy_write, len)?;

        let mut read = BitReader::new(MemByteReader::new(copy_write.into_inner()?.into_inner()));

        let mut copy_write = BitWriter::unbuffered(MemByteWriterVec::new(Vec::<u8>::new()));
        copy_write.copy_from(&mut read, len)?;

        let mut read = BitReader::new(MemByteReader::new(copy_write.into_inner()?.into_inner()));

        let mut r = SmallRng::seed_from_u64(0);
        for _ in 0..len {
            assert_eq!(read.read_bits(1)?, r.random_range(0..2));
        }
    }

    Ok(())
}

#[test]
fn test_copy_unaligned() -> Result<(), Box<dyn std::error::Error>> {
    let data: Vec<u8> = (0..=255).collect();
    let mut read = BitReader::new(MemByteReader::new(&data));
    assert_eq!(read.read_bits(3)?, 0);

    let mut write = BitWriter::new(MemByteWriterVec::new(Vec::<u8>::new()));
    write.write_bits(0b111, 3)?;
    read.copy_to(&mut write, 255 * 8 + 5)?;
    let copied = write.into_inner()?.into_inner();
    // the three bits skipped are replaced by ones
    assert_eq!(copied[0], 0b1110_0000);
    assert_eq!(&copied[1..], &data[1..]);
    Ok(())
}

#[test]
fn test_copy_errors() {
    let mut read = BitReader::new(MemByteReader::new([0xff_u8; 2]));
    let mut write = BitWriter::new(MemByteWriterVec::new(Vec::<u8>::new()));
    assert!(matches!(
        read.copy_to(&mut write, 17),
        Err(CopyError::ReadError(ReadError::UnexpectedEof))
    ));

    let mut read = BitReader::new(MemByteReader::new([0xff_u8; 4]));
    let mut bytes = [0_u8; 1];
    let mut write = BitWriter::unbuffered(MemByteWriter::new(&mut bytes));
    match write.copy_from(&mut read, 32) {
        Err(CopyError::WriteError(err)) => assert_eq!(
            *err.get_ref(),
            MemError::Full {
                byte_pos: 1,
                requested: 1
            }
        ),
        res => panic!("unexpected result {res:?}"),
    }
}
