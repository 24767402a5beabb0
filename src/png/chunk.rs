use super::*;

/// A parsed PNG chunk, covering the chunk types this library processes.
///
/// When you have a [`RawPngChunk`], use `PngChunk::try_from` to attempt to
/// convert it into this form.
#[derive(Debug, Clone, Copy)]
#[allow(missing_docs)]
#[allow(nonstandard_style)]
pub enum PngChunk<'b> {
  IHDR(IHDR),
  PLTE(PLTE<'b>),
  IDAT(IDAT<'b>),
  tRNS(tRNS<'b>),
  IEND,
}
impl<'b> TryFrom<RawPngChunk<'b>> for PngChunk<'b> {
  type Error = PngError;
  #[inline]
  fn try_from(raw: RawPngChunk<'b>) -> PngResult<Self> {
    Ok(match raw.chunk_ty {
      PngChunkTy::IHDR => PngChunk::IHDR(IHDR::try_from(raw.data)?),
      PngChunkTy::PLTE => match bytemuck::try_cast_slice::<u8, [u8; 3]>(raw.data) {
        Ok(entries) => PngChunk::PLTE(PLTE { entries }),
        Err(_) => return Err(PngError::InvalidHeader),
      },
      PngChunkTy::IDAT => PngChunk::IDAT(IDAT { data: raw.data }),
      PngChunkTy::tRNS => PngChunk::tRNS(match *raw.data {
        [y0, y1] => tRNS::Y { y: u16::from_be_bytes([y0, y1]) },
        [r0, r1, g0, g1, b0, b1] => tRNS::RGB {
          r: u16::from_be_bytes([r0, r1]),
          g: u16::from_be_bytes([g0, g1]),
          b: u16::from_be_bytes([b0, b1]),
        },
        _ => tRNS::Index { data: raw.data },
      }),
      PngChunkTy::IEND => PngChunk::IEND,
      _ => return Err(PngError::UnknownChunkType),
    })
  }
}

/// `PLTE`: Palette.
///
/// * This chunk is required for indexed color PNGs, where it converts index
///   values to RGB. There can be fewer entries than the bit depth allows; an
///   index past the end of the palette decodes as opaque black.
/// * For other color types a `PLTE` chunk is only a quantization suggestion,
///   and this decoder ignores it.
#[derive(Debug, Clone, Copy)]
#[allow(missing_docs)]
pub struct PLTE<'b> {
  pub entries: &'b [[u8; 3]],
}

/// `IDAT`: Image data.
///
/// One or more image data chunks hold a single zlib data stream, which
/// decompresses to the filtered scanlines of the PNG. When there is more than
/// one image data chunk (the common case) their payloads concatenate in
/// stream order.
#[derive(Debug, Clone, Copy)]
#[allow(missing_docs)]
pub struct IDAT<'b> {
  pub data: &'b [u8],
}

/// `tRNS`: Transparency.
///
/// * `Y` and `RGB` each store a single color. Pixels of exactly that color are
///   fully transparent (alpha 0) while the rest stay fully opaque. The chunk
///   always stores 16 bits per channel here, whatever the image's bit depth.
/// * `Index` carries one alpha value per palette entry. If it's shorter than
///   the palette, the missing entries are fully opaque.
///
/// **Note:** the parser picks `Y` or `RGB` purely by data length, so for an
/// indexed color image a transparency slice of length 2 or 6 will arrive as
/// the `Y` or `RGB` variant even though it was *supposed* to be per-entry
/// alpha. Use [`y_to_index`](Self::y_to_index) / [`rgb_to_index`](Self::rgb_to_index)
/// to get the original bytes back in that case.
#[derive(Debug, Clone, Copy)]
#[allow(missing_docs)]
#[allow(nonstandard_style)]
pub enum tRNS<'b> {
  Y { y: u16 },
  RGB { r: u16, g: u16, b: u16 },
  Index { data: &'b [u8] },
}
impl<'b> tRNS<'b> {
  /// Convert a `tRNS::Y` back to the index bytes.
  ///
  /// Gives `None` if this isn't the `Y` variant.
  #[inline]
  #[must_use]
  pub const fn y_to_index(self) -> Option<[u8; 2]> {
    match self {
      Self::Y { y } => Some(y.to_be_bytes()),
      _ => None,
    }
  }

  /// Convert a `tRNS::RGB` back to the index bytes.
  ///
  /// Gives `None` if this isn't the `RGB` variant.
  #[inline]
  #[must_use]
  pub const fn rgb_to_index(self) -> Option<[u8; 6]> {
    match self {
      Self::RGB { r, g, b } => {
        let [r0, r1] = r.to_be_bytes();
        let [g0, g1] = g.to_be_bytes();
        let [b0, b1] = b.to_be_bytes();
        Some([r0, r1, g0, g1, b0, b1])
      }
      _ => None,
    }
  }
}
