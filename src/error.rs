/// An error from decoding a PNG data stream.
///
/// Every error is fatal for the decode in progress: no partial image is ever
/// produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PngError {
  /// The first 8 bytes of the input are not the PNG signature.
  BadSignature,

  /// The input ran out of bytes while a structure still required more.
  ///
  /// This covers a compressed stream that ends mid-field as well as `IDAT`
  /// data that is too short for the image the header declares.
  UnexpectedEndOfInput,

  /// A critical chunk was malformed.
  ///
  /// `IHDR` missing, misplaced, the wrong length, or holding a field outside
  /// its allowed set; or a `PLTE` payload that isn't a whole number of RGB
  /// entries.
  InvalidHeader,

  /// The stream needs a capability this decoder doesn't have.
  ///
  /// Preset dictionaries (`FDICT`), zlib compression methods other than
  /// deflate, over-large deflate windows, and PNG compression / filter /
  /// interlace methods outside the baseline spec all land here.
  UnsupportedFeature,

  /// The zlib header's check value isn't a multiple of 31.
  FCheckFailed,

  /// A deflate block used the reserved block type (`0b11`).
  InvalidBlockType,

  /// A stored block's `LEN` and `NLEN` fields aren't ones' complements.
  InvalidStoredLength,

  /// A code length sequence can't form a canonical prefix code, or a symbol
  /// was requested from an alphabet with no codes at all.
  InvalidHuffmanCode,

  /// A back-reference reached before the start of the output, or a
  /// length/distance symbol was outside its alphabet.
  InvalidBackReference,

  /// The image is indexed color but there was no `PLTE` chunk.
  MissingPalette,

  /// A scanline declared a filter type other than 0 through 4.
  IllegalFilterType,

  /// The chunk type isn't one this library understands.
  ///
  /// The top level decoder skips such chunks, so you'll only see this when
  /// converting raw chunks yourself.
  UnknownChunkType,

  /// The all-in-one decoder limits images to 17,000 pixels in width and
  /// height to prevent accidental out-of-memory problems.
  ///
  /// If you drive the decoding stages yourself you can bypass this limit.
  ImageTooLarge,

  /// The allocator couldn't give us enough space.
  #[cfg(feature = "alloc")]
  AllocationFailed,
}

#[cfg(feature = "alloc")]
impl From<alloc::collections::TryReserveError> for PngError {
  #[inline]
  fn from(_: alloc::collections::TryReserveError) -> Self {
    Self::AllocationFailed
  }
}

/// Alias for a `Result` with [PngError] as the error type.
pub type PngResult<T> = Result<T, PngError>;
