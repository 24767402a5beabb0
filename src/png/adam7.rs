use super::*;

/// Starting offset and stride of one interlace pass, in full-image pixels.
#[derive(Debug, Clone, Copy)]
struct InterlacePass {
  start_x: u32,
  start_y: u32,
  stride_x: u32,
  stride_y: u32,
}

/// The seven passes of the Adam7 pattern, in transmission order.
///
/// ```txt
/// 1 6 4 6 2 6 4 6
/// 7 7 7 7 7 7 7 7
/// 5 6 5 6 5 6 5 6
/// 7 7 7 7 7 7 7 7
/// 3 6 4 6 3 6 4 6
/// 7 7 7 7 7 7 7 7
/// 5 6 5 6 5 6 5 6
/// 7 7 7 7 7 7 7 7
/// ```
const ADAM7_PASSES: [InterlacePass; 7] = [
  InterlacePass { start_x: 0, start_y: 0, stride_x: 8, stride_y: 8 },
  InterlacePass { start_x: 4, start_y: 0, stride_x: 8, stride_y: 8 },
  InterlacePass { start_x: 0, start_y: 4, stride_x: 4, stride_y: 8 },
  InterlacePass { start_x: 2, start_y: 0, stride_x: 4, stride_y: 4 },
  InterlacePass { start_x: 0, start_y: 2, stride_x: 2, stride_y: 4 },
  InterlacePass { start_x: 1, start_y: 0, stride_x: 2, stride_y: 2 },
  InterlacePass { start_x: 0, start_y: 1, stride_x: 1, stride_y: 2 },
];

/// How many of the pass's strides fit in the span past its starting offset,
/// counting a final partial stride as one more.
const fn pass_extent(full: u32, start: u32, stride: u32) -> u32 {
  let span = full.saturating_sub(start);
  span / stride + if (span % stride) != 0 { 1 } else { 0 }
}

/// Given the dimensions of the full PNG image, computes the size of each
/// reduced image.
///
/// The PNG interlacing scheme converts a full image to 7 reduced images, each
/// with potentially separate dimensions. Knowing the size of each reduced
/// image is important for the unfiltering process.
///
/// The output uses index 0 as the base image size, and indexes 1 through 7
/// for the size of reduced images 1 through 7. Reduced images can have zero
/// width or height (and then transmit no data at all), so check.
#[inline]
#[must_use]
pub const fn reduced_image_dimensions(full_width: u32, full_height: u32) -> [(u32, u32); 8] {
  let mut out = [(full_width, full_height); 8];
  let mut i = 0;
  while i < 7 {
    let pass = ADAM7_PASSES[i];
    out[i + 1] = (
      pass_extent(full_width, pass.start_x, pass.stride_x),
      pass_extent(full_height, pass.start_y, pass.stride_y),
    );
    i += 1;
  }
  out
}

/// Converts a reduced image location into the full image location.
///
/// For consistency with [reduced_image_dimensions], an `image_level` of 0
/// means the full image, and the output is the same as the input.
///
/// ## Panics
/// * If the image level given exceeds 7.
#[inline]
#[must_use]
pub const fn interlaced_pos_to_full_pos(
  image_level: usize, reduced_x: u32, reduced_y: u32,
) -> (u32, u32) {
  if image_level == 0 {
    return (reduced_x, reduced_y);
  }
  assert!(image_level <= 7, "reduced image level must be 0 through 7");
  let pass = ADAM7_PASSES[image_level - 1];
  (pass.start_x + reduced_x * pass.stride_x, pass.start_y + reduced_y * pass.stride_y)
}
