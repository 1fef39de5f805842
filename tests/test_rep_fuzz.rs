/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/// Replay the corpus, if present, and a batch of random inputs through the
/// fuzzing harness.
#[cfg(feature = "fuzz")]
#[test]
fn test_rep_fuzz_bit_stream() -> Result<(), Box<dyn std::error::Error>> {
    use arbitrary::Arbitrary;
    use msb_bitstream::fuzz::bit_stream::*;
    use rand::rngs::SmallRng;
    use rand::{RngCore, SeedableRng};

    let dir = "fuzz/corpus/bit_stream";
    if let Ok(entries) = std::fs::read_dir(dir) {
        for file in entries {
            let file = file?;
            if file.file_type()?.is_dir() {
                continue;
            }
            let file_bytes = std::fs::read(file.path())?;
            let mut unstructured = arbitrary::Unstructured::new(&file_bytes);
            harness(FuzzCase::arbitrary(&mut unstructured)?);
        }
    }

    let mut r = SmallRng::seed_from_u64(0);
    for len in 0..2000 {
        let mut bytes = vec![0; len];
        r.fill_bytes(&mut bytes);
        let mut unstructured = arbitrary::Unstructured::new(&bytes);
        harness(FuzzCase::arbitrary(&mut unstructured)?);
    }

    Ok(())
}
