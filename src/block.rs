use std::{mem, ptr::NonNull};

use static_assertions::const_assert;

use crate::align::ALIGNMENT;

/// Header preceding every payload in the arena.
///
/// ```text
///   ┌──────────────────┬──────────────────────────────┐
///   │ size │ next      │ payload (size bytes)         │
///   └──────────────────┴──────────────────────────────┘
///   ▲                  ▲
///   block address      block address + HEADER_SIZE
/// ```
///
/// `next` is only meaningful while the block sits in the free list.
#[repr(C, align(16))]
pub struct Block {
  pub size: usize,
  pub next: Option<NonNull<Block>>,
}

pub const HEADER_SIZE: usize = mem::size_of::<Block>();

const_assert!(ALIGNMENT.is_power_of_two());
const_assert!(HEADER_SIZE % ALIGNMENT == 0);
const_assert!(mem::align_of::<Block>() >= ALIGNMENT);

impl Block {
  pub fn new(
    size: usize,
    next: Option<NonNull<Block>>,
  ) -> Self {
    Self { size, next }
  }

  /// Writes a fresh header at `at` and returns it as a block.
  ///
  /// # Safety
  ///
  /// `at` must be aligned for `Block` and valid for writes of
  /// `HEADER_SIZE + size` bytes.
  pub unsafe fn init(
    at: NonNull<u8>,
    size: usize,
  ) -> NonNull<Block> {
    let block = at.cast::<Block>();
    unsafe { block.write(Block::new(size, None)) };
    block
  }

  /// Payload pointer handed to clients: one header past the block start.
  pub fn payload(block: NonNull<Block>) -> NonNull<u8> {
    unsafe { block.cast::<u8>().add(HEADER_SIZE) }
  }

  /// Recovers the header from a payload pointer.
  ///
  /// # Safety
  ///
  /// `payload` must have been produced by [`Block::payload`].
  pub unsafe fn from_payload(payload: NonNull<u8>) -> NonNull<Block> {
    unsafe { payload.sub(HEADER_SIZE).cast::<Block>() }
  }

  /// Address one past the last payload byte.
  ///
  /// # Safety
  ///
  /// `block` must point at an initialized header.
  pub unsafe fn end(block: NonNull<Block>) -> usize {
    block.as_ptr() as usize + HEADER_SIZE + unsafe { (*block.as_ptr()).size }
  }

  /// Grows `into` by the whole byte range of `absorbed`, header included.
  ///
  /// # Safety
  ///
  /// Both blocks must be initialized and `absorbed` must start exactly where
  /// `into` ends.
  pub unsafe fn absorb(
    into: NonNull<Block>,
    absorbed: NonNull<Block>,
  ) {
    unsafe {
      debug_assert_eq!(Block::end(into), absorbed.as_ptr() as usize);
      (*into.as_ptr()).size += HEADER_SIZE + (*absorbed.as_ptr()).size;
    }
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;

  /// Sixteen-byte aligned scratch memory for building headers by hand.
  #[repr(C, align(16))]
  pub(crate) struct Scratch<const N: usize>(pub [u8; N]);

  impl<const N: usize> Scratch<N> {
    pub(crate) fn new() -> Self {
      Self([0; N])
    }

    pub(crate) fn at(
      &mut self,
      offset: usize,
    ) -> NonNull<u8> {
      assert!(offset < N);
      unsafe { NonNull::new_unchecked(self.0.as_mut_ptr().add(offset)) }
    }
  }

  /// Lays out `sizes` back to back in `scratch`, returning the headers.
  pub(crate) fn carve<const N: usize>(
    scratch: &mut Scratch<N>,
    sizes: &[usize],
  ) -> Vec<NonNull<Block>> {
    let mut offset = 0;
    sizes
      .iter()
      .map(|&size| {
        let block = unsafe { Block::init(scratch.at(offset), size) };
        offset += HEADER_SIZE + size;
        block
      })
      .collect()
  }

  #[test]
  fn test_header_layout() {
    assert_eq!(HEADER_SIZE % ALIGNMENT, 0);
    assert!(HEADER_SIZE >= mem::size_of::<usize>() * 2);
  }

  #[test]
  fn test_payload_round_trip() {
    let mut scratch = Scratch::<128>::new();

    unsafe {
      let block = Block::init(scratch.at(0), 32);
      let payload = Block::payload(block);

      assert_eq!(payload.as_ptr() as usize - block.as_ptr() as usize, HEADER_SIZE);
      assert_eq!(payload.as_ptr() as usize % ALIGNMENT, 0);
      assert_eq!(Block::from_payload(payload), block);
      assert_eq!(Block::end(block), payload.as_ptr() as usize + 32);
    }
  }

  #[test]
  fn test_absorb() {
    let mut scratch = Scratch::<256>::new();

    unsafe {
      let first = Block::init(scratch.at(0), 32);
      let second = Block::init(scratch.at(HEADER_SIZE + 32), 48);

      Block::absorb(first, second);

      assert_eq!((*first.as_ptr()).size, 32 + HEADER_SIZE + 48);
      assert_eq!(Block::end(first), Block::end(second));
    }
  }
}
