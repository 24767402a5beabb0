#![no_std]
#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

//! A crate to decode PNG data into RGBA pixels.
//!
//! The decoder is self-contained: the zlib/DEFLATE decompression of the image
//! data is performed by this crate's own inflate engine, so there is no
//! dependency on an external decompressor.
//!
//! * With the `alloc` feature (on by default) you can call
//!   [`decode_png_to_bitmap_rgba8`](png::decode_png_to_bitmap_rgba8) and get a
//!   complete [`Bitmap`] of [`r8g8b8a8_Srgb`](pixel_formats::r8g8b8a8_Srgb)
//!   pixels back.
//! * Without `alloc` the chunk and header parsing layer in the [`png`] module
//!   still works on borrowed slices, and you can drive the unfiltering
//!   yourself with buffers you provide.

#[cfg(feature = "alloc")]
extern crate alloc;

mod error;
pub use error::*;

#[cfg(feature = "alloc")]
mod image;
#[cfg(feature = "alloc")]
pub use image::*;

#[cfg(feature = "alloc")]
mod bit_source;
#[cfg(feature = "alloc")]
mod huffman;
#[cfg(feature = "alloc")]
mod inflate;
#[cfg(feature = "alloc")]
pub use inflate::*;

pub mod png;
