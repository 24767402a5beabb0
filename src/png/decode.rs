use super::*;

use alloc::vec::Vec;
use bitfrob::u8_replicate_bits;
use pixel_formats::r8g8b8a8_Srgb;

use crate::{image::Bitmap, inflate::decompress_zlib};

const OPAQUE_BLACK: r8g8b8a8_Srgb = r8g8b8a8_Srgb { r: 0, g: 0, b: 0, a: 255 };

/// Normalizes a 16-bit transparency key channel to the 8-bit range its pixels
/// are decoded at: replicate the meaningful low bits at depths below 8, keep
/// the high byte at depth 16.
fn key_channel_to_8bpc(value: u16, bits_per_channel: usize) -> u8 {
  match bits_per_channel {
    1 | 2 | 4 => u8_replicate_bits(bits_per_channel as u32, value as u8),
    8 => value as u8,
    _ => (value >> 8) as u8,
  }
}

/// Decodes PNG bytes into a bitmap of RGBA pixels, 8 bits per channel.
///
/// This runs the whole pipeline: signature and chunk parsing, header
/// validation, zlib decompression of the image data, filter reversal,
/// de-interlacing, and conversion of every pixel format to RGBA:
///
/// * Greyscale below 8 bits scales up to the full 0-255 range; 16 bit
///   channels keep their high byte.
/// * Indexed color goes through the `PLTE` palette, with `tRNS` per-entry
///   alpha applied when present.
/// * A `tRNS` color key on greyscale or RGB images makes exactly-matching
///   pixels fully transparent.
///
/// There is no partial success: any error aborts the decode.
///
/// ## Failure
/// * [`BadSignature`](PngError::BadSignature): not PNG data at all.
/// * [`ImageTooLarge`](PngError::ImageTooLarge): width or height over 17,000.
///   This limit is only a guard against absurd allocations from corrupt
///   headers; decode the stages yourself to go bigger.
/// * Anything else: see [`PngError`] for the full taxonomy.
pub fn decode_png_to_bitmap_rgba8(png: &[u8]) -> PngResult<Bitmap<r8g8b8a8_Srgb>> {
  if !is_png_signature(png) {
    return Err(PngError::BadSignature);
  }

  let mut chunks = RawPngChunkIter::new(png);
  let header = match chunks.next() {
    Some(raw) if raw.chunk_ty == PngChunkTy::IHDR => IHDR::try_from(raw.data)?,
    _ => return Err(PngError::InvalidHeader),
  };
  if header.width > 17_000 || header.height > 17_000 {
    return Err(PngError::ImageTooLarge);
  }

  let mut palette: Option<PLTE<'_>> = None;
  let mut transparency: Option<tRNS<'_>> = None;
  let mut idat_slices: Vec<&[u8]> = Vec::new();
  for raw in chunks {
    match PngChunk::try_from(raw) {
      Ok(PngChunk::PLTE(plte)) => {
        if palette.is_none() {
          palette = Some(plte)
        }
      }
      Ok(PngChunk::tRNS(trns)) => {
        if transparency.is_none() {
          transparency = Some(trns)
        }
      }
      Ok(PngChunk::IDAT(idat)) => idat_slices.push(idat.data),
      Ok(PngChunk::IEND) => break,
      // a second IHDR is a duplicate chunk; the first one already won.
      Ok(PngChunk::IHDR(_)) => (),
      Err(PngError::UnknownChunkType) => (),
      Err(e) => return Err(e),
    }
  }

  let mut idat_it = idat_slices.iter().copied();
  let first = idat_it.next().ok_or(PngError::UnexpectedEndOfInput)?;
  let size_hint = header.temp_memory_requirement();
  let mut decompressed = decompress_zlib(first, idat_it, size_hint)?;
  if decompressed.len() < size_hint {
    return Err(PngError::UnexpectedEndOfInput);
  }

  let pal = build_palette(header, palette, transparency)?;

  let depth = header.pixel_format.bits_per_channel();
  let mut gray_key: Option<u8> = None;
  let mut rgb_key: Option<[u8; 3]> = None;
  match (header.pixel_format, transparency) {
    (PngPixelFormat::Y1 | PngPixelFormat::Y2 | PngPixelFormat::Y4 | PngPixelFormat::Y8
      | PngPixelFormat::Y16, Some(tRNS::Y { y })) => {
      gray_key = Some(key_channel_to_8bpc(y, depth));
    }
    (PngPixelFormat::RGB8 | PngPixelFormat::RGB16, Some(tRNS::RGB { r, g, b })) => {
      rgb_key = Some([
        key_channel_to_8bpc(r, depth),
        key_channel_to_8bpc(g, depth),
        key_channel_to_8bpc(b, depth),
      ]);
    }
    // indexed transparency already lives in the palette's alpha values, and
    // a key on an always-alpha format has no meaning.
    _ => (),
  }

  let mut bitmap = Bitmap { width: header.width, height: header.height, pixels: Vec::new() };
  let pixel_count = (header.width as usize) * (header.height as usize);
  bitmap.pixels.try_reserve(pixel_count)?;
  bitmap.pixels.resize(pixel_count, OPAQUE_BLACK);

  unfilter_decompressed_data(header, &mut decompressed, |x, y, data| {
    use PngPixelFormat::*;
    // writes past the image edge are packed-slot or stride overshoot; drop
    // them here.
    let p = match bitmap.get_mut(x, y) {
      Some(p) => p,
      None => return,
    };
    *p = match header.pixel_format {
      Y1 | Y2 | Y4 => {
        let y8 = u8_replicate_bits(depth as u32, data[0]);
        let a = if gray_key == Some(y8) { 0 } else { 255 };
        r8g8b8a8_Srgb { r: y8, g: y8, b: y8, a }
      }
      Y8 | Y16 => {
        let y8 = data[0];
        let a = if gray_key == Some(y8) { 0 } else { 255 };
        r8g8b8a8_Srgb { r: y8, g: y8, b: y8, a }
      }
      I1 | I2 | I4 | I8 => pal[data[0] as usize],
      RGB8 => {
        let rgb = [data[0], data[1], data[2]];
        let a = if rgb_key == Some(rgb) { 0 } else { 255 };
        r8g8b8a8_Srgb { r: rgb[0], g: rgb[1], b: rgb[2], a }
      }
      RGB16 => {
        let rgb = [data[0], data[2], data[4]];
        let a = if rgb_key == Some(rgb) { 0 } else { 255 };
        r8g8b8a8_Srgb { r: rgb[0], g: rgb[1], b: rgb[2], a }
      }
      YA8 => r8g8b8a8_Srgb { r: data[0], g: data[0], b: data[0], a: data[1] },
      YA16 => r8g8b8a8_Srgb { r: data[0], g: data[0], b: data[0], a: data[2] },
      RGBA8 => r8g8b8a8_Srgb { r: data[0], g: data[1], b: data[2], a: data[3] },
      RGBA16 => r8g8b8a8_Srgb { r: data[0], g: data[2], b: data[4], a: data[6] },
    };
  })?;

  Ok(bitmap)
}

/// Builds the full 256-entry RGBA palette for an indexed image: RGB from
/// `PLTE`, alpha 255 except where `tRNS` says otherwise, opaque black past
/// the end of the declared entries.
///
/// Non-indexed images get the same default table without requiring a `PLTE`.
fn build_palette(
  header: IHDR, palette: Option<PLTE<'_>>, transparency: Option<tRNS<'_>>,
) -> PngResult<[r8g8b8a8_Srgb; 256]> {
  let mut pal = [OPAQUE_BLACK; 256];
  if !header.pixel_format.is_indexed() {
    return Ok(pal);
  }
  let entries = palette.ok_or(PngError::MissingPalette)?.entries;
  for (slot, [r, g, b]) in pal.iter_mut().zip(entries.iter().copied()) {
    *slot = r8g8b8a8_Srgb { r, g, b, a: 255 };
  }
  match transparency {
    Some(tRNS::Index { data }) => {
      for (slot, a) in pal.iter_mut().zip(data.iter().copied()) {
        slot.a = a;
      }
    }
    Some(t) => {
      // 2- and 6-byte payloads parse as the Y and RGB variants, but for an
      // indexed image they were really per-entry alpha values.
      if let Some(alphas) = t.y_to_index() {
        for (slot, a) in pal.iter_mut().zip(alphas) {
          slot.a = a;
        }
      } else if let Some(alphas) = t.rgb_to_index() {
        for (slot, a) in pal.iter_mut().zip(alphas) {
          slot.a = a;
        }
      }
    }
    None => (),
  }
  Ok(pal)
}
