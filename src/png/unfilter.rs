use super::*;

/// The Paeth filter function computes a simple linear function of the three
/// neighboring bytes (left `a`, above `b`, upper left `c`) and predicts
/// whichever neighbor is closest to it.
///
/// Any neighbor that isn't present because this is the top or left edge of
/// the image substitutes as 0.
const fn paeth_predict(a: u8, b: u8, c: u8) -> u8 {
  // the spec requires these calculations to be exact, so they get i32 math,
  // which is wide enough for any u8 inputs.
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p: i32 = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  // the order of evaluation of these tests must not be altered.
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

/// Reverses one scanline's filter in place.
///
/// * `prev` is the already-reconstructed previous line of the *same* reduced
///   image, or `None` on the first line (every neighbor above reads as 0).
/// * `bpp` is the filter stride: the bytes per complete pixel, minimum 1.
///
/// All reconstruction is modulo 256, except that `Average` sums its two
/// neighbors in wider arithmetic before halving.
fn unfilter_line(line: &mut [u8], prev: Option<&[u8]>, bpp: usize, filter: u8) -> PngResult<()> {
  match filter {
    0 => (),
    1 => {
      // Sub: the first bpp bytes have no left neighbor and stay as they are.
      for i in bpp..line.len() {
        line[i] = line[i].wrapping_add(line[i - bpp]);
      }
    }
    2 => {
      // Up
      if let Some(prev) = prev {
        for (x, b) in line.iter_mut().zip(prev.iter().copied()) {
          *x = x.wrapping_add(b);
        }
      }
    }
    3 => {
      // Average
      for i in 0..line.len() {
        let a = if i >= bpp { line[i - bpp] as u16 } else { 0 };
        let b = match prev {
          Some(prev) => prev[i] as u16,
          None => 0,
        };
        line[i] = line[i].wrapping_add(((a + b) / 2) as u8);
      }
    }
    4 => {
      // Paeth
      for i in 0..line.len() {
        let a = if i >= bpp { line[i - bpp] } else { 0 };
        let (b, c) = match prev {
          Some(prev) => (prev[i], if i >= bpp { prev[i - bpp] } else { 0 }),
          None => (0, 0),
        };
        line[i] = line[i].wrapping_add(paeth_predict(a, b, c));
      }
    }
    _ => return Err(PngError::IllegalFilterType),
  }
  Ok(())
}

/// Walks one reconstructed line and hands each pixel's raw samples to `op`,
/// positioned within the full image.
///
/// Formats below 8 bits per pixel unpack MSB-first, one call per pixel, with
/// the value in the low bits of a single byte. A partial trailing byte still
/// emits all of its packed slots; the slots past the reduced width map past
/// the image edge, which the receiver is expected to discard (the bounds
/// checked writes of [`Bitmap`](crate::Bitmap) do this for free).
fn send_out_line<F: FnMut(u32, u32, &[u8])>(
  pixel_format: PngPixelFormat, image_level: usize, reduced_y: u32, line: &[u8], op: &mut F,
) {
  match pixel_format.bits_per_channel() {
    depth @ (1 | 2 | 4) => {
      let samples_per_byte = 8 / depth;
      let mut reduced_x = 0_u32;
      for byte in line.iter().copied() {
        let mut shifted = byte;
        for _ in 0..samples_per_byte {
          let value = shifted >> (8 - depth);
          let (x, y) = interlaced_pos_to_full_pos(image_level, reduced_x, reduced_y);
          op(x, y, &[value]);
          shifted <<= depth;
          reduced_x += 1;
        }
      }
    }
    8 | 16 => {
      for (reduced_x, data) in line.chunks_exact(pixel_format.bytes_per_pixel()).enumerate() {
        let (x, y) = interlaced_pos_to_full_pos(image_level, reduced_x as u32, reduced_y);
        op(x, y, data);
      }
    }
    _ => unreachable!(),
  }
}

/// Given the `header` and the decompressed `IDAT` data, reverses the
/// per-scanline filters and passes each pixel to `op` as it's recovered.
///
/// Each call to `op` gets `|x, y, data|` as arguments, where `x` and `y` are
/// the pixel's position in the *full* image (interlaced data is spread back
/// out to its final positions), and `data` is the pixel's unfiltered bytes as
/// described in [the module docs](crate::png#manual-decoding).
///
/// The data is unfiltered in place, and each filter byte is reset to the "no
/// filter" setting, so calling this twice on the same buffer is fine if you
/// want to iterate the pixels a second time.
///
/// Interlaced images reconstruct each reduced image independently: filters
/// never reach across the boundary between two reduced images.
///
/// ## Failure
/// * You **are** allowed to pass a buffer larger than the data itself; only
///   the correct number of bytes from its start are used. A buffer that's too
///   small fails with [`UnexpectedEndOfInput`](PngError::UnexpectedEndOfInput)
///   (possibly after some amount of unfiltering is done).
/// * A filter byte outside 0..=4 fails with
///   [`IllegalFilterType`](PngError::IllegalFilterType).
pub fn unfilter_decompressed_data<F>(
  header: IHDR, mut decompressed: &mut [u8], mut op: F,
) -> PngResult<()>
where
  F: FnMut(u32, u32, &[u8]),
{
  let bpp = header.pixel_format.bytes_per_pixel();

  // Non-interlaced data is handled as "level 0": a single reduced image with
  // the full dimensions. Interlaced data takes levels 1 through 7 instead.
  let mut image_it = reduced_image_dimensions(header.width, header.height)
    .into_iter()
    .enumerate()
    .take(if header.is_interlaced { 8 } else { 1 });
  if header.is_interlaced {
    image_it.next();
  }

  for (image_level, (reduced_width, reduced_height)) in image_it {
    if reduced_width == 0 || reduced_height == 0 {
      // the full image can't be zero sized, but a reduced image can, and then
      // it transmits nothing at all.
      continue;
    }
    let bytes_per_filterline = header.pixel_format.bytes_per_scanline(reduced_width) + 1;
    let bytes_used_this_image = bytes_per_filterline.saturating_mul(reduced_height as usize);
    if decompressed.len() < bytes_used_this_image {
      return Err(PngError::UnexpectedEndOfInput);
    }
    let (these_bytes, more_bytes) = decompressed.split_at_mut(bytes_used_this_image);
    decompressed = more_bytes;

    let mut prev: Option<&[u8]> = None;
    for (reduced_y, filter_line) in these_bytes.chunks_exact_mut(bytes_per_filterline).enumerate()
    {
      let (filter_byte, line) = filter_line.split_first_mut().unwrap();
      unfilter_line(line, prev, bpp, *filter_byte)?;
      *filter_byte = 0;
      send_out_line(header.pixel_format, image_level, reduced_y as u32, line, &mut op);
      prev = Some(line);
    }
  }

  Ok(())
}
