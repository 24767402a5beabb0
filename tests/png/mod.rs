use pngling::{
  png::{
    decode_png_to_bitmap_rgba8, interlaced_pos_to_full_pos, reduced_image_dimensions,
    RawPngChunkIter,
  },
  PngError,
};
use walkdir::WalkDir;

/// Frames one chunk: length, type, data, and a CRC.
///
/// The decoder parses but never verifies chunk CRCs, so the tests write a
/// zero there rather than hauling a CRC implementation around.
fn chunk(ty: &[u8; 4], data: &[u8]) -> Vec<u8> {
  let mut v = Vec::new();
  v.extend_from_slice(&(data.len() as u32).to_be_bytes());
  v.extend_from_slice(ty);
  v.extend_from_slice(data);
  v.extend_from_slice(&0_u32.to_be_bytes());
  v
}

/// Wraps raw bytes in a zlib stream of stored blocks.
///
/// Stored blocks can be framed with nothing but byte juggling, which keeps
/// these tests independent of any compressor while still exercising the whole
/// zlib layer. The Adler-32 trailer is appended as zeros; the decoder ignores
/// it.
fn zlib_stored(raw: &[u8]) -> Vec<u8> {
  let mut v = vec![0x78, 0x01];
  let mut rest = raw;
  loop {
    let take = rest.len().min(0xFFFF);
    let (head, tail) = rest.split_at(take);
    v.push(u8::from(tail.is_empty()));
    v.extend_from_slice(&(take as u16).to_le_bytes());
    v.extend_from_slice(&(!(take as u16)).to_le_bytes());
    v.extend_from_slice(head);
    if tail.is_empty() {
      break;
    }
    rest = tail;
  }
  v.extend_from_slice(&[0, 0, 0, 0]);
  v
}

/// Assembles a complete PNG around already-filtered scanline data.
///
/// The zlib stream is cut across two `IDAT` chunks so every test also proves
/// that chunk payloads concatenate correctly.
fn make_png(
  width: u32, height: u32, depth: u8, color_type: u8, interlace: u8, plte: Option<&[u8]>,
  trns: Option<&[u8]>, filtered: &[u8],
) -> Vec<u8> {
  let mut ihdr = Vec::new();
  ihdr.extend_from_slice(&width.to_be_bytes());
  ihdr.extend_from_slice(&height.to_be_bytes());
  ihdr.extend_from_slice(&[depth, color_type, 0, 0, interlace]);

  let mut png = vec![137, 80, 78, 71, 13, 10, 26, 10];
  png.extend(chunk(b"IHDR", &ihdr));
  if let Some(p) = plte {
    png.extend(chunk(b"PLTE", p));
  }
  if let Some(t) = trns {
    png.extend(chunk(b"tRNS", t));
  }
  // an unknown ancillary chunk, which the decoder must skip over.
  png.extend(chunk(b"tIME", &[0x07, 0xE0, 1, 1, 0, 0, 0]));
  let z = zlib_stored(filtered);
  let (a, b) = z.split_at(z.len() / 2);
  png.extend(chunk(b"IDAT", a));
  png.extend(chunk(b"IDAT", b));
  png.extend(chunk(b"IEND", &[]));
  png
}

#[test]
fn test_decode_1bit_gray() {
  // 32x32, 1 bit per pixel: even rows alternate starting white, odd rows all
  // black. 4 data bytes per line, filter 0 on every line.
  let mut filtered = Vec::new();
  for y in 0..32 {
    filtered.push(0);
    for _ in 0..4 {
      filtered.push(if y % 2 == 0 { 0b1010_1010 } else { 0 });
    }
  }
  let png = make_png(32, 32, 1, 0, 0, None, None, &filtered);
  let bitmap = decode_png_to_bitmap_rgba8(&png).unwrap();
  assert_eq!(bitmap.width, 32);
  assert_eq!(bitmap.height, 32);
  assert_eq!(bitmap.pixels.len(), 32 * 32);
  for y in 0..32 {
    for x in 0..32 {
      let p = bitmap[(x, y)];
      let white = y % 2 == 0 && x % 2 == 0;
      let expected = if white { (255, 255, 255, 255) } else { (0, 0, 0, 255) };
      assert_eq!((p.r, p.g, p.b, p.a), expected, "({x},{y})");
    }
  }
}

#[test]
fn test_decode_rgb8_with_sub_filter() {
  // row 0 unfiltered, row 1 Sub-filtered, so the decode exercises real
  // filter reversal and not just pass-through.
  let filtered = [
    0, 10, 20, 30, 40, 50, 60, // (10,20,30) (40,50,60)
    1, 5, 5, 5, 1, 1, 1, // sub: (5,5,5) then (6,6,6)
  ];
  let png = make_png(2, 2, 8, 2, 0, None, None, &filtered);
  let bitmap = decode_png_to_bitmap_rgba8(&png).unwrap();
  let expected = [(10, 20, 30), (40, 50, 60), (5, 5, 5), (6, 6, 6)];
  for (p, (r, g, b)) in bitmap.pixels.iter().zip(expected) {
    assert_eq!((p.r, p.g, p.b, p.a), (r, g, b, 255));
  }
}

#[test]
fn test_decode_4bit_indexed_with_palette_alpha() {
  // 3x2, 4 bits per index: two data bytes per line, the low nibble of the
  // second byte is padding. Index 5 is past the end of the palette and
  // decodes as opaque black.
  let palette: &[u8] = &[
    0xFF, 0x00, 0x00, // 0: red
    0x00, 0xFF, 0x00, // 1: green
    0x00, 0x00, 0xFF, // 2: blue
  ];
  let trns: &[u8] = &[255, 128, 0];
  let filtered = [
    0, 0x01, 0x20, // indexes 0 1 2
    0, 0x21, 0x50, // indexes 2 1 5
  ];
  let png = make_png(3, 2, 4, 3, 0, Some(palette), Some(trns), &filtered);
  let bitmap = decode_png_to_bitmap_rgba8(&png).unwrap();
  let expected = [
    (255, 0, 0, 255),
    (0, 255, 0, 128),
    (0, 0, 255, 0),
    (0, 0, 255, 0),
    (0, 255, 0, 128),
    (0, 0, 0, 255),
  ];
  for (p, e) in bitmap.pixels.iter().zip(expected) {
    assert_eq!((p.r, p.g, p.b, p.a), e);
  }
}

#[test]
fn test_indexed_without_palette_is_an_error() {
  let filtered = [0, 0x01, 0x20, 0, 0x21, 0x50];
  let png = make_png(3, 2, 4, 3, 0, None, None, &filtered);
  assert_eq!(decode_png_to_bitmap_rgba8(&png), Err(PngError::MissingPalette));
}

#[test]
fn test_interlaced_decodes_same_as_straight() {
  // the same 8x8 8-bit gray image, stored both ways, must decode to
  // identical bitmaps.
  let value_at = |x: u32, y: u32| (16 * x + y) as u8;

  let mut straight = Vec::new();
  for y in 0..8 {
    straight.push(0);
    for x in 0..8 {
      straight.push(value_at(x, y));
    }
  }

  let mut interlaced = Vec::new();
  let dims = reduced_image_dimensions(8, 8);
  for level in 1..=7 {
    let (w, h) = dims[level];
    for ry in 0..h {
      interlaced.push(0);
      for rx in 0..w {
        let (x, y) = interlaced_pos_to_full_pos(level, rx, ry);
        interlaced.push(value_at(x, y));
      }
    }
  }

  let png_straight = make_png(8, 8, 8, 0, 0, None, None, &straight);
  let png_interlaced = make_png(8, 8, 8, 0, 1, None, None, &interlaced);
  let a = decode_png_to_bitmap_rgba8(&png_straight).unwrap();
  let b = decode_png_to_bitmap_rgba8(&png_interlaced).unwrap();
  assert_eq!(a, b);
  // sanity: the pattern actually landed where it should.
  let p = a[(3, 5)];
  assert_eq!((p.r, p.g, p.b, p.a), (value_at(3, 5), value_at(3, 5), value_at(3, 5), 255));
}

#[test]
fn test_interlaced_filters_stay_within_their_pass() {
  // 8x8 gray, every pass Up-filtered with zero deltas after the first line:
  // each pass must copy down its own first line. If filtering leaked between
  // passes this produces different pixels entirely.
  let mut interlaced = Vec::new();
  let dims = reduced_image_dimensions(8, 8);
  for level in 1..=7 {
    let (w, h) = dims[level];
    for ry in 0..h {
      if ry == 0 {
        interlaced.push(0); // None
        for _ in 0..w {
          interlaced.push(level as u8 * 10);
        }
      } else {
        interlaced.push(2); // Up, all zero deltas
        for _ in 0..w {
          interlaced.push(0);
        }
      }
    }
  }
  let png = make_png(8, 8, 8, 0, 1, None, None, &interlaced);
  let bitmap = decode_png_to_bitmap_rgba8(&png).unwrap();
  let dims = reduced_image_dimensions(8, 8);
  for level in 1..=7 {
    let (w, h) = dims[level];
    for ry in 0..h {
      for rx in 0..w {
        let (x, y) = interlaced_pos_to_full_pos(level, rx, ry);
        let p = bitmap[(x, y)];
        assert_eq!(p.r, level as u8 * 10, "level {level} at ({x},{y})");
      }
    }
  }
}

#[test]
fn test_rgb16_color_key() {
  // three pixels of 16-bit RGB: the key color, a different color, and a
  // color matching the key in the high bytes only. Pixels are keyed after
  // truncation to 8 bits per channel, so both the first and third pixel come
  // out transparent.
  let filtered = [
    0, // filter byte
    0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, // the key color exactly
    0x20, 0x00, 0x60, 0x00, 0xA0, 0x00, // clearly different
    0x12, 0xFF, 0x56, 0xFF, 0x9A, 0xFF, // same high bytes as the key
  ];
  let trns: &[u8] = &[0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC];
  let png = make_png(3, 1, 16, 2, 0, None, Some(trns), &filtered);
  let bitmap = decode_png_to_bitmap_rgba8(&png).unwrap();
  let expected = [
    (0x12, 0x56, 0x9A, 0),
    (0x20, 0x60, 0xA0, 255),
    (0x12, 0x56, 0x9A, 0),
  ];
  for (p, e) in bitmap.pixels.iter().zip(expected) {
    assert_eq!((p.r, p.g, p.b, p.a), e);
  }
}

#[test]
fn test_gray_color_key_scales_to_sample_depth() {
  // 2 bit gray with a key of 0b01: the key must be compared post-scaling
  // (0b01 scales to 0x55), so only the second pixel drops out.
  let filtered = [0, 0b00_01_10_11]; // pixels 0,1,2,3
  let trns: &[u8] = &[0x00, 0x01];
  let png = make_png(4, 1, 2, 0, 0, None, Some(trns), &filtered);
  let bitmap = decode_png_to_bitmap_rgba8(&png).unwrap();
  let expected = [(0, 255), (0x55, 0), (0xAA, 255), (0xFF, 255)];
  for (p, (v, a)) in bitmap.pixels.iter().zip(expected) {
    assert_eq!((p.r, p.g, p.b, p.a), (v, v, v, a));
  }
}

#[test]
fn test_gray_alpha_and_rgba_promotion() {
  let filtered = [0, 77, 128, 200, 255];
  let png = make_png(2, 1, 8, 4, 0, None, None, &filtered);
  let bitmap = decode_png_to_bitmap_rgba8(&png).unwrap();
  let p = bitmap[(0, 0)];
  assert_eq!((p.r, p.g, p.b, p.a), (77, 77, 77, 128));
  let p = bitmap[(1, 0)];
  assert_eq!((p.r, p.g, p.b, p.a), (200, 200, 200, 255));

  // 16-bit RGBA keeps each channel's high byte.
  let filtered = [0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88];
  let png = make_png(1, 1, 16, 6, 0, None, None, &filtered);
  let bitmap = decode_png_to_bitmap_rgba8(&png).unwrap();
  let p = bitmap[(0, 0)];
  assert_eq!((p.r, p.g, p.b, p.a), (0x11, 0x33, 0x55, 0x77));
}

#[test]
fn test_invalid_headers_are_rejected() {
  // depth 3 doesn't exist.
  let png = make_png(32, 32, 3, 0, 0, None, None, &[0; 33]);
  assert_eq!(decode_png_to_bitmap_rgba8(&png), Err(PngError::InvalidHeader));
  // neither does a zero width.
  let png = make_png(0, 32, 8, 0, 0, None, None, &[]);
  assert_eq!(decode_png_to_bitmap_rgba8(&png), Err(PngError::InvalidHeader));
  // a broken signature never gets as far as the header.
  let mut png = make_png(32, 32, 8, 0, 0, None, None, &[0; 9 * 32]);
  png[0] = 0x88;
  assert_eq!(decode_png_to_bitmap_rgba8(&png), Err(PngError::BadSignature));
  // a PNG whose first chunk isn't IHDR is also a header problem.
  let mut png = vec![137, 80, 78, 71, 13, 10, 26, 10];
  png.extend(chunk(b"IDAT", &[1, 2, 3]));
  assert_eq!(decode_png_to_bitmap_rgba8(&png), Err(PngError::InvalidHeader));
}

#[test]
fn test_short_image_data_is_rejected() {
  // the header wants 32x32 but the stream only carries 4 scanlines.
  let mut filtered = Vec::new();
  for _ in 0..4 {
    filtered.push(0);
    filtered.extend_from_slice(&[7; 32]);
  }
  let png = make_png(32, 32, 8, 0, 0, None, None, &filtered);
  assert_eq!(decode_png_to_bitmap_rgba8(&png), Err(PngError::UnexpectedEndOfInput));

  // no IDAT chunks at all.
  let mut png = vec![137, 80, 78, 71, 13, 10, 26, 10];
  let mut ihdr = Vec::new();
  ihdr.extend_from_slice(&2_u32.to_be_bytes());
  ihdr.extend_from_slice(&2_u32.to_be_bytes());
  ihdr.extend_from_slice(&[8, 0, 0, 0, 0]);
  png.extend(chunk(b"IHDR", &ihdr));
  png.extend(chunk(b"IEND", &[]));
  assert_eq!(decode_png_to_bitmap_rgba8(&png), Err(PngError::UnexpectedEndOfInput));
}

#[test]
fn test_compressed_idat_decodes_like_stored() {
  // the same image data compressed for real (dynamic/fixed huffman blocks)
  // must decode identically to the stored-block framing the other tests use.
  let mut filtered = Vec::new();
  for y in 0..16_u32 {
    filtered.push(if y % 4 == 0 { 0 } else { 2 });
    for x in 0..16_u32 {
      filtered.push(if y % 4 == 0 { ((x * 37) % 256) as u8 } else { 0 });
    }
  }
  let stored_png = make_png(16, 16, 8, 0, 0, None, None, &filtered);

  let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&filtered, 6);
  let mut ihdr = Vec::new();
  ihdr.extend_from_slice(&16_u32.to_be_bytes());
  ihdr.extend_from_slice(&16_u32.to_be_bytes());
  ihdr.extend_from_slice(&[8, 0, 0, 0, 0]);
  let mut compressed_png = vec![137, 80, 78, 71, 13, 10, 26, 10];
  compressed_png.extend(chunk(b"IHDR", &ihdr));
  for piece in compressed.chunks(7) {
    compressed_png.extend(chunk(b"IDAT", piece));
  }
  compressed_png.extend(chunk(b"IEND", &[]));

  let a = decode_png_to_bitmap_rgba8(&stored_png).unwrap();
  let b = decode_png_to_bitmap_rgba8(&compressed_png).unwrap();
  assert_eq!(a, b);
}

#[test]
fn test_output_length_is_always_4_w_h() {
  for (w, h, depth, color) in [(1, 1, 8, 0), (7, 3, 1, 0), (5, 5, 8, 6), (2, 9, 16, 2)] {
    let mut filtered = Vec::new();
    let line_bits = (w as usize)
      * (depth as usize)
      * match color {
        2 => 3,
        6 => 4,
        _ => 1,
      };
    for _ in 0..h {
      filtered.push(0);
      filtered.extend(std::iter::repeat(0x5A).take((line_bits + 7) / 8));
    }
    let png = make_png(w, h, depth, color, 0, None, None, &filtered);
    let bitmap = decode_png_to_bitmap_rgba8(&png).unwrap();
    assert_eq!(bitmap.pixels.len(), (w * h) as usize, "{w}x{h} depth {depth} color {color}");
  }
}

#[test]
fn test_chunk_iter_never_panics_on_arbitrary_files() {
  // iter ALL files in the test folder, even non-png files shouldn't panic it.
  for entry in WalkDir::new("tests/").into_iter().filter_map(|e| e.ok()) {
    let v = match std::fs::read(entry.path()) {
      Ok(v) => v,
      Err(_) => continue,
    };
    for _ in RawPngChunkIter::new(&v) {
      //
    }
    let _ = decode_png_to_bitmap_rgba8(&v);
  }
}

#[test]
fn test_decoder_never_panics_on_random_bytes() {
  // random data should error out somewhere, never panic.
  for _ in 0..10 {
    let mut v = super::rand_bytes(1024);
    let _ = decode_png_to_bitmap_rgba8(&v);
    // and again with a real signature so it gets past the first gate.
    v[..8].copy_from_slice(&[137, 80, 78, 71, 13, 10, 26, 10]);
    let _ = decode_png_to_bitmap_rgba8(&v);
  }
}

#[test]
fn test_truncated_png_errors_cleanly() {
  let mut filtered = Vec::new();
  for _ in 0..8 {
    filtered.push(0);
    filtered.extend_from_slice(&[9; 8]);
  }
  let png = make_png(8, 8, 8, 0, 0, None, None, &filtered);
  // every cut that loses image data must error; the final 12 bytes are only
  // the IEND chunk, which the decoder doesn't require.
  for cut in 0..png.len() - 12 {
    assert!(decode_png_to_bitmap_rgba8(&png[..cut]).is_err(), "cut at {cut}");
  }
  assert!(decode_png_to_bitmap_rgba8(&png).is_ok());
}
