#![no_main]

use libfuzzer_sys::fuzz_target;
use msb_bitstream::fuzz::bit_stream::*;

fuzz_target!(|data: FuzzCase| harness(data));
