use super::*;

/// The pixel formats allowed in a PNG file.
///
/// This combines a channel layout with a bit depth per channel; only the
/// combinations the PNG spec allows exist as variants, so holding one of
/// these is itself proof the header's depth and color type fields agree.
///
/// * The Greyscale (`Y`) and Indexed (`I`) formats allow for pixels that are
///   only 1, 2, or 4 bits each. In this case, the pixels are tightly packed
///   into bytes, with the left-most pixel being the highest bits of the byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum PngPixelFormat {
  Y1,
  Y2,
  Y4,
  Y8,
  Y16,
  RGB8,
  RGB16,
  I1,
  I2,
  I4,
  I8,
  YA8,
  YA16,
  RGBA8,
  RGBA16,
}
impl PngPixelFormat {
  /// Given an image's *pixel* width, calculates the *bytes* for a full
  /// scanline in this format.
  ///
  /// This doesn't include the filter byte that precedes each line in the
  /// decompressed data, so the temporary memory requirements are slightly
  /// larger.
  #[inline]
  #[must_use]
  pub const fn bytes_per_scanline(self, width: u32) -> usize {
    let width = width as usize;
    match self {
      Self::Y1 | Self::I1 => width / 8 + if (width % 8) != 0 { 1 } else { 0 },
      Self::Y2 | Self::I2 => width / 4 + if (width % 4) != 0 { 1 } else { 0 },
      Self::Y4 | Self::I4 => width / 2 + if (width % 2) != 0 { 1 } else { 0 },
      Self::Y8 | Self::I8 => width,
      Self::Y16 | Self::YA8 => width * 2,
      Self::RGB8 => width * 3,
      Self::YA16 | Self::RGBA8 => width * 4,
      Self::RGB16 => width * 6,
      Self::RGBA16 => width * 8,
    }
  }

  /// Bytes per complete pixel, never less than 1.
  ///
  /// This is the stride that the `Sub`/`Average`/`Paeth` filters step by.
  /// Filters apply to bytes rather than samples, so sub-byte formats still
  /// use a stride of one whole byte.
  #[inline]
  #[must_use]
  pub const fn bytes_per_pixel(self) -> usize {
    use PngPixelFormat::*;
    match self {
      Y1 | Y2 | Y4 | Y8 | I1 | I2 | I4 | I8 => 1,
      Y16 | YA8 => 2,
      RGB8 => 3,
      YA16 | RGBA8 => 4,
      RGB16 => 6,
      RGBA16 => 8,
    }
  }

  /// The bit depth of each channel.
  #[inline]
  #[must_use]
  pub const fn bits_per_channel(self) -> usize {
    use PngPixelFormat::*;
    match self {
      Y1 | I1 => 1,
      Y2 | I2 => 2,
      Y4 | I4 => 4,
      Y8 | I8 | YA8 | RGB8 | RGBA8 => 8,
      Y16 | RGB16 | YA16 | RGBA16 => 16,
    }
  }

  /// Is this an indexed-color format?
  #[inline]
  #[must_use]
  pub const fn is_indexed(self) -> bool {
    matches!(self, Self::I1 | Self::I2 | Self::I4 | Self::I8)
  }
}

/// `IHDR`: Image header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IHDR {
  /// Width in pixels. Never 0 in a parsed header.
  pub width: u32,

  /// Height in pixels. Never 0 in a parsed header.
  pub height: u32,

  /// Format of the pixels.
  pub pixel_format: PngPixelFormat,

  /// If the pixel data is interlaced or not.
  pub is_interlaced: bool,
}
impl TryFrom<&[u8]> for IHDR {
  type Error = PngError;
  /// Parses the 13-byte big-endian `IHDR` payload.
  ///
  /// ## Failure
  /// * [`InvalidHeader`](PngError::InvalidHeader): wrong payload length, a
  ///   zero dimension, or a depth / color type combination outside the spec.
  /// * [`UnsupportedFeature`](PngError::UnsupportedFeature): a compression,
  ///   filter, or interlace method beyond the baseline spec.
  fn try_from(data: &[u8]) -> PngResult<Self> {
    if data.len() != 13 {
      return Err(PngError::InvalidHeader);
    }
    let width = u32::from_be_bytes(data[0..4].try_into().unwrap());
    let height = u32::from_be_bytes(data[4..8].try_into().unwrap());
    if width == 0 || height == 0 {
      return Err(PngError::InvalidHeader);
    }
    let pixel_format = match (data[8], data[9]) {
      (1, 0) => PngPixelFormat::Y1,
      (2, 0) => PngPixelFormat::Y2,
      (4, 0) => PngPixelFormat::Y4,
      (8, 0) => PngPixelFormat::Y8,
      (16, 0) => PngPixelFormat::Y16,
      (8, 2) => PngPixelFormat::RGB8,
      (16, 2) => PngPixelFormat::RGB16,
      (1, 3) => PngPixelFormat::I1,
      (2, 3) => PngPixelFormat::I2,
      (4, 3) => PngPixelFormat::I4,
      (8, 3) => PngPixelFormat::I8,
      (8, 4) => PngPixelFormat::YA8,
      (16, 4) => PngPixelFormat::YA16,
      (8, 6) => PngPixelFormat::RGBA8,
      (16, 6) => PngPixelFormat::RGBA16,
      _ => return Err(PngError::InvalidHeader),
    };
    if data[10] != 0 || data[11] != 0 || data[12] > 1 {
      return Err(PngError::UnsupportedFeature);
    }
    Ok(Self { width, height, pixel_format, is_interlaced: data[12] == 1 })
  }
}
impl IHDR {
  /// How much temporary memory the decompressed image data needs.
  ///
  /// This is the sum over every (reduced) image of one filter byte plus the
  /// scanline bytes, per scanline. Interlaced images sum all seven reduced
  /// images; zero-size reduced images contribute nothing.
  #[inline]
  #[must_use]
  pub fn temp_memory_requirement(self) -> usize {
    if self.is_interlaced {
      let mut total = 0;
      let [_full, passes @ ..] = reduced_image_dimensions(self.width, self.height);
      for (width, height) in passes {
        total += temp_bytes_for_image(width, height, self.pixel_format);
      }
      total
    } else {
      temp_bytes_for_image(self.width, self.height, self.pixel_format)
    }
  }
}

/// Temp bytes for a single (possibly reduced) image of the given dimensions.
#[inline]
#[must_use]
const fn temp_bytes_for_image(width: u32, height: u32, pixel_format: PngPixelFormat) -> usize {
  if width == 0 {
    return 0;
  }
  let bytes_per_filterline = pixel_format.bytes_per_scanline(width).saturating_add(1);
  bytes_per_filterline.saturating_mul(height as usize)
}
