/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Implementations of byte sources and sinks, and of bit readers and writers.

If you need to read or write bytes from a file or any backend implementing
[`std::io::Read`] or [`std::io::Write`] you just need to wrap it in a
[`ByteAdapter`].

If instead you want to read or write directly from memory, you can use
[`MemByteReader`], [`MemByteWriter`] (a fixed-size slice) and
[`MemByteWriterVec`] (a growing vector).

Once you have a way to access bytes, you can use [`BitReader`] and
[`BitWriter`] to read or write bits, bytes and fields of up to 64 bits,
most significant bit first. [`BitWriter`] collects completed bytes in a
buffer of [`DEFAULT_BUFFER_SIZE`] bytes unless built with
[`BitWriter::unbuffered`], in which case every byte is passed to the
backend as soon as it is complete.

*/

mod mem_byte_reader;
pub use mem_byte_reader::*;

mod mem_byte_writer;
pub use mem_byte_writer::*;

mod byte_adapter;
pub use byte_adapter::*;

mod bit_reader;
pub use bit_reader::{BitReader, ReadError};

mod bit_writer;
pub use bit_writer::{BitWriter, DEFAULT_BUFFER_SIZE, WriteError};
