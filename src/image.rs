#![forbid(unsafe_code)]

//! Provides a heap-allocated image container for decoder output.

use core::ops::{Index, IndexMut};

use alloc::vec::Vec;

/// A direct-color image.
///
/// * `pixels` holds `width * height` values in row-major order. The decoder
///   fills row 0 with the top of the image; whether your consumer wants that
///   row first or last is between you and your GPU library.
/// * If you build your own instance with a `pixels` length that doesn't match
///   the dimensions, the accessors will give weird results and possibly
///   panic, so please don't.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub struct Bitmap<P> {
  pub width: u32,
  pub height: u32,
  pub pixels: Vec<P>,
}
impl<P> Bitmap<P> {
  /// Linear index of a position that's already known to be in bounds.
  #[inline]
  const fn index_of(&self, x: u32, y: u32) -> usize {
    (y * self.width + x) as usize
  }

  /// Gets a shared reference to the pixel at the position, or `None` if the
  /// position is out of bounds.
  #[inline]
  #[must_use]
  pub fn get(&self, x: u32, y: u32) -> Option<&P> {
    if x >= self.width || y >= self.height {
      return None;
    }
    self.pixels.get(self.index_of(x, y))
  }

  /// Gets a unique reference to the pixel at the position, or `None` if the
  /// position is out of bounds.
  #[inline]
  #[must_use]
  pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut P> {
    if x >= self.width || y >= self.height {
      return None;
    }
    let i = self.index_of(x, y);
    self.pixels.get_mut(i)
  }
}
impl<P> Index<(u32, u32)> for Bitmap<P> {
  type Output = P;
  #[inline]
  #[track_caller]
  fn index(&self, (x, y): (u32, u32)) -> &Self::Output {
    let (w, h) = (self.width, self.height);
    match self.get(x, y) {
      Some(p) => p,
      None => panic!("position ({x},{y}) is outside this {w}x{h} bitmap"),
    }
  }
}
impl<P> IndexMut<(u32, u32)> for Bitmap<P> {
  #[inline]
  #[track_caller]
  fn index_mut(&mut self, (x, y): (u32, u32)) -> &mut Self::Output {
    let (w, h) = (self.width, self.height);
    match self.get_mut(x, y) {
      Some(p) => p,
      None => panic!("position ({x},{y}) is outside this {w}x{h} bitmap"),
    }
  }
}
