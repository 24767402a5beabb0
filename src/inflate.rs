use alloc::vec::Vec;

use crate::{bit_source::BitSource, huffman::HuffTable, PngError, PngResult};

/// Base lengths for length symbols 257..=285.
const LENGTH_BASE: [u16; 29] = [
  3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
  163, 195, 227, 258,
];

/// Extra bits for length symbols 257..=285.
const LENGTH_EXTRA: [u8; 29] =
  [0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0];

/// Base distances for distance symbols 0..=29.
const DIST_BASE: [u16; 30] = [
  1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
  2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];

/// Extra bits for distance symbols 0..=29.
const DIST_EXTRA: [u8; 30] =
  [0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13, 13];

/// The order in which a dynamic block transmits its code length code lengths.
const CODE_LENGTH_PERMUTATION: [usize; 19] =
  [16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15];

/// Decompresses a zlib data stream given as one or more byte slices.
///
/// PNG stores its compressed image data as a single zlib stream cut across
/// successive `IDAT` chunks, so the input here is a first slice plus an
/// iterator of any continuation slices, in stream order. For a stream that's
/// already in one piece, pass `core::iter::empty()` as `more`.
///
/// `size_hint` should be the expected size of the decompressed output (for a
/// PNG, [`IHDR::temp_memory_requirement`](crate::png::IHDR::temp_memory_requirement)).
/// It only pre-sizes the output buffer; the stream is decompressed in full
/// either way.
///
/// The trailing Adler-32 checksum of the stream is *not* verified.
///
/// ## Failure
/// * Zlib headers that aren't plain deflate with a standard window give
///   [`UnsupportedFeature`](PngError::UnsupportedFeature) or
///   [`FCheckFailed`](PngError::FCheckFailed).
/// * A stream that ends mid-structure gives
///   [`UnexpectedEndOfInput`](PngError::UnexpectedEndOfInput).
/// * Corrupt block data gives the matching
///   [`InvalidBlockType`](PngError::InvalidBlockType) /
///   [`InvalidStoredLength`](PngError::InvalidStoredLength) /
///   [`InvalidHuffmanCode`](PngError::InvalidHuffmanCode) /
///   [`InvalidBackReference`](PngError::InvalidBackReference) error.
pub fn decompress_zlib<'b, I>(first: &'b [u8], more: I, size_hint: usize) -> PngResult<Vec<u8>>
where
  I: Iterator<Item = &'b [u8]>,
{
  let mut bits = BitSource::new(first, more);

  let cm = bits.next_bits_lsb(4)?;
  let cinfo = bits.next_bits_lsb(4)?;
  if cm != 8 || cinfo > 7 {
    return Err(PngError::UnsupportedFeature);
  }
  let fcheck = bits.next_bits_lsb(5)?;
  let fdict = bits.next_bits_lsb(1)?;
  let flevel = bits.next_bits_lsb(2)?;
  if fdict != 0 {
    return Err(PngError::UnsupportedFeature);
  }
  let cmf = (cinfo << 4) | cm;
  let flg = (flevel << 6) | (fdict << 5) | fcheck;
  if (cmf * 256 + flg) % 31 != 0 {
    return Err(PngError::FCheckFailed);
  }

  let mut output: Vec<u8> = Vec::new();
  output.try_reserve(size_hint)?;

  loop {
    let bfinal = bits.get_bfinal()?;
    match bits.get_btype()? {
      0 => {
        bits.align_to_byte();
        let len = bits.next_bits_lsb(16)?;
        let nlen = bits.next_bits_lsb(16)?;
        if len != (!nlen) & 0xFFFF {
          return Err(PngError::InvalidStoredLength);
        }
        for _ in 0..len {
          output.push(bits.next_bits_lsb(8)? as u8);
        }
      }
      1 => {
        let lit_len_table = HuffTable::fixed_lit_len()?;
        let dist_table = HuffTable::fixed_dist()?;
        inflate_block(&mut bits, &lit_len_table, &dist_table, &mut output)?;
      }
      2 => {
        let (lit_len_table, dist_table) = read_dynamic_tables(&mut bits)?;
        inflate_block(&mut bits, &lit_len_table, &dist_table, &mut output)?;
      }
      _ => return Err(PngError::InvalidBlockType),
    }
    if bfinal {
      break;
    }
  }
  Ok(output)
}

/// Reads the code length declarations of a dynamic block and builds its
/// literal/length and distance tables.
fn read_dynamic_tables<'b, I: Iterator<Item = &'b [u8]>>(
  bits: &mut BitSource<'b, I>,
) -> PngResult<(HuffTable, HuffTable)> {
  let hlit = bits.next_bits_lsb(5)? as usize + 257;
  let hdist = bits.next_bits_lsb(5)? as usize + 1;
  let hclen = bits.next_bits_lsb(4)? as usize + 4;

  let mut code_length_lengths = [0_u8; 19];
  for permuted in CODE_LENGTH_PERMUTATION.iter().copied().take(hclen) {
    code_length_lengths[permuted] = bits.next_bits_lsb(3)? as u8;
  }
  let code_length_table = HuffTable::from_code_lengths(&code_length_lengths)?;

  // One run of lengths covers both alphabets, so a repeat code may flow from
  // the end of the literal/length lengths into the distance lengths.
  let total = hlit + hdist;
  let mut lengths: Vec<u8> = Vec::new();
  lengths.try_reserve(total)?;
  while lengths.len() < total {
    match code_length_table.decode_symbol(bits)? {
      len @ 0..=15 => lengths.push(len as u8),
      16 => {
        let previous = *lengths.last().ok_or(PngError::InvalidHuffmanCode)?;
        let repeat_count = 3 + bits.next_bits_lsb(2)?;
        for _ in 0..repeat_count {
          lengths.push(previous);
        }
      }
      17 => {
        let repeat_count = 3 + bits.next_bits_lsb(3)?;
        for _ in 0..repeat_count {
          lengths.push(0);
        }
      }
      18 => {
        let repeat_count = 11 + bits.next_bits_lsb(7)?;
        for _ in 0..repeat_count {
          lengths.push(0);
        }
      }
      _ => return Err(PngError::InvalidHuffmanCode),
    }
  }
  lengths.truncate(total);

  let lit_len_table = HuffTable::from_code_lengths(&lengths[..hlit])?;
  let dist_table = HuffTable::from_code_lengths(&lengths[hlit..])?;
  Ok((lit_len_table, dist_table))
}

/// Runs one huffman coded block's symbol loop until its end-of-block marker.
fn inflate_block<'b, I: Iterator<Item = &'b [u8]>>(
  bits: &mut BitSource<'b, I>, lit_len_table: &HuffTable, dist_table: &HuffTable,
  output: &mut Vec<u8>,
) -> PngResult<()> {
  loop {
    let symbol = lit_len_table.decode_symbol(bits)?;
    match symbol {
      0..=255 => output.push(symbol as u8),
      256 => return Ok(()),
      257..=285 => {
        let length_index = (symbol - 257) as usize;
        let length = LENGTH_BASE[length_index] as usize
          + bits.next_bits_lsb(LENGTH_EXTRA[length_index] as u32)? as usize;

        let dist_symbol = dist_table.decode_symbol(bits)? as usize;
        if dist_symbol >= DIST_BASE.len() {
          return Err(PngError::InvalidBackReference);
        }
        let distance = DIST_BASE[dist_symbol] as usize
          + bits.next_bits_lsb(DIST_EXTRA[dist_symbol] as u32)? as usize;
        if distance > output.len() {
          return Err(PngError::InvalidBackReference);
        }

        // When `distance < length` the reference overlaps the bytes it is
        // itself producing and expands as a run, so this must stay a
        // byte-at-a-time copy.
        let mut src = output.len() - distance;
        for _ in 0..length {
          let byte = output[src];
          output.push(byte);
          src += 1;
        }
      }
      _ => return Err(PngError::InvalidBackReference),
    }
  }
}
