use std::ptr::NonNull;

use crate::block::{Block, HEADER_SIZE};

/// Trims a free block down to `size` payload bytes, carving the tail into a
/// new free block.
///
/// ```text
///   before: │ H │ size = S                                   │
///   after:  │ H │ size = `size` │ H │ size = S - size - H    │
///                                 ▲
///                                 remainder, linked right after `block`
/// ```
///
/// Returns `None`, leaving `block` untouched, when the tail cannot hold a
/// header of its own. The remainder inherits `block`'s list successor and
/// `block` then points at the remainder, so the list stays intact whether
/// or not `block` is removed afterwards.
///
/// # Safety
///
/// `block` must be an initialized header owning `HEADER_SIZE + block.size`
/// bytes of arena memory, and `size` must be a multiple of the alignment.
pub unsafe fn split(
  block: NonNull<Block>,
  size: usize,
) -> Option<NonNull<Block>> {
  unsafe {
    let header = block.as_ptr();
    let needed = size.checked_add(HEADER_SIZE)?;

    if (*header).size < needed {
      return None;
    }

    let remainder = Block::init(Block::payload(block).add(size), (*header).size - needed);
    (*remainder.as_ptr()).next = (*header).next;

    (*header).size = size;
    (*header).next = Some(remainder);

    Some(block)
  }
}
