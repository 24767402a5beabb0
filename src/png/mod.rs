#![forbid(unsafe_code)]

//! Module for decoding PNG data.
//!
//! * [Portable Network Graphics (PNG) Specification][png-spec]
//!
//! [png-spec]: https://www.w3.org/TR/png/
//!
//! ## Library Design Assumptions
//!
//! * The entire PNG encoded data stream is a single byte slice, already in
//!   memory. There is no support for "stream" decoding that keeps only a
//!   minimal amount of live data.
//! * Decoding always targets 8 bits per channel RGBA. Data with 16 bit
//!   channels keeps the high byte of each channel, and data below 8 bits is
//!   scaled up to the full 0-255 range.
//!
//! ## Automatic Decoding
//!
//! Just call [`decode_png_to_bitmap_rgba8`] and the decoder will do its best.
//! This requires the `alloc` crate feature.
//!
//! ## Manual Decoding
//!
//! If you want control over when allocations happen you can run the stages
//! yourself:
//!
//! 1) Iterate [`RawPngChunkIter`] to find the `IHDR` chunk and parse it into
//!    an [`IHDR`] value. This describes the width, height, and pixel format.
//! 2) Call [`IHDR::temp_memory_requirement`] to size a buffer for the
//!    decompressed image data. Because of the per-scanline filter bytes you
//!    *cannot* decompress directly into the final image buffer.
//! 3) Decompress the concatenated `IDAT` chunk payloads (in stream order) with
//!    [`decompress_zlib`](crate::decompress_zlib) — they form one zlib stream
//!    regardless of how many chunks it was cut into. This gives you
//!    *filtered* data, not the final data you want.
//! 4) Call [`unfilter_decompressed_data`] with a closure `op(x, y, data)`,
//!    which is called once per pixel with the reconstructed raw samples:
//!    * Bit depths 1, 2, and 4 get the value in the low bits of a single byte.
//!    * Bit depth 8 gets one byte per channel.
//!    * Bit depth 16 gets two big-endian bytes per channel.
//!
//! ## Parsing Errors
//!
//! Quoting [section 13.2 of the PNG spec][spec-13-2]:
//!
//! > Errors that have little or no effect on the processing of the image may
//! > be ignored, while those that affect critical data shall be dealt with in
//! > a manner appropriate to the application.
//!
//! [spec-13-2]: https://www.w3.org/TR/2003/REC-PNG-20031110/#13Decoders.Errors
//!
//! In that spirit the decoder ignores what it can:
//!
//! * Chunk ordering rules, other than `IHDR` coming first, as well as rules
//!   against duplicate chunks (you'll generally get the first one).
//! * Ancillary chunks the library doesn't understand: they are framed and
//!   skipped.
//! * Both of the checksum systems (CRC-32 on individual chunks, Adler-32 on
//!   the zlib stream). [`RawPngChunk::actual_crc`] is provided if you want to
//!   check chunks yourself.

use crate::error::{PngError, PngResult};

mod adam7;
mod chunk;
mod ihdr;
mod raw_chunk;
mod unfilter;
pub use self::{adam7::*, chunk::*, ihdr::*, raw_chunk::*, unfilter::*};

#[cfg(feature = "alloc")]
mod decode;
#[cfg(feature = "alloc")]
pub use decode::*;
