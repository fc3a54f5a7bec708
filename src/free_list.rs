use std::{marker::PhantomData, ptr::NonNull};

use crate::block::Block;

/// Singly-linked chain of reclaimable blocks, threaded through the blocks'
/// own headers.
///
/// ```text
///   head ──▶ ┌────┐ ──▶ ┌────┐ ──▶ ┌────┐ ──▶ None
///            │ B7 │     │ B2 │     │ B4 │
///            └────┘     └────┘     └────┘
///                         ▲
///                       cursor
/// ```
///
/// Order is insertion order (newest first), not address order. The list
/// owns no memory; it only organizes headers that live in the arena.
///
/// The next-fit cursor always designates a member of the list or is `None`
/// (meaning "start at head"). [`FreeList::remove`] keeps it that way.
pub struct FreeList {
  head: Option<NonNull<Block>>,
  cursor: Option<NonNull<Block>>,
}

impl FreeList {
  pub const fn new() -> Self {
    Self {
      head: None,
      cursor: None,
    }
  }

  #[cfg(test)]
  pub fn cursor(&self) -> Option<NonNull<Block>> {
    self.cursor
  }

  pub fn is_empty(&self) -> bool {
    self.head.is_none()
  }

  /// Points the next search at `block`, or at the head when `None`.
  ///
  /// # Safety
  ///
  /// `block` must be a member of this list.
  pub unsafe fn set_cursor(
    &mut self,
    block: Option<NonNull<Block>>,
  ) {
    self.cursor = block;
  }

  pub fn reset_cursor(&mut self) {
    self.cursor = None;
  }

  pub fn iter(&self) -> Iter<'_> {
    Iter {
      current: self.head,
      _list: PhantomData,
    }
  }

  pub fn len(&self) -> usize {
    self.iter().count()
  }

  pub fn contains(
    &self,
    block: NonNull<Block>,
  ) -> bool {
    self.iter().any(|member| member == block)
  }

  /// Prepends `block`.
  ///
  /// # Safety
  ///
  /// `block` must be an initialized header that is not already listed and
  /// not in use by a client.
  pub unsafe fn insert(
    &mut self,
    block: NonNull<Block>,
  ) {
    debug_assert!(!self.contains(block), "block {block:?} listed twice");
    unsafe { (*block.as_ptr()).next = self.head };
    self.head = Some(block);
  }

  /// Unlinks `block` wherever it sits. Returns `false` if it was not listed.
  ///
  /// If the cursor designated `block` it moves on to `block`'s successor.
  ///
  /// # Safety
  ///
  /// `block` must be an initialized header.
  pub unsafe fn remove(
    &mut self,
    block: NonNull<Block>,
  ) -> bool {
    unsafe {
      let next = (*block.as_ptr()).next;
      let mut link: *mut Option<NonNull<Block>> = &mut self.head;

      while let Some(current) = *link {
        if current == block {
          *link = next;
          if self.cursor == Some(block) {
            self.cursor = next;
          }
          return true;
        }
        link = &mut (*current.as_ptr()).next;
      }

      false
    }
  }

  /// Free block whose byte range ends exactly where `block` begins.
  ///
  /// # Safety
  ///
  /// `block` must be an initialized header.
  pub unsafe fn find_predecessor_by_address(
    &self,
    block: NonNull<Block>,
  ) -> Option<NonNull<Block>> {
    let start = block.as_ptr() as usize;
    self
      .iter()
      .find(|&candidate| unsafe { Block::end(candidate) } == start)
  }

  /// Free block beginning exactly where `block`'s byte range ends.
  ///
  /// # Safety
  ///
  /// `block` must be an initialized header.
  pub unsafe fn find_successor_by_address(
    &self,
    block: NonNull<Block>,
  ) -> Option<NonNull<Block>> {
    let end = unsafe { Block::end(block) };
    self
      .iter()
      .find(|&candidate| candidate.as_ptr() as usize == end)
  }

  /// Next-fit search: the first block holding at least `size` payload bytes,
  /// scanning from the cursor to the tail and then wrapping from the head
  /// back to the cursor.
  pub fn next_fit(
    &self,
    size: usize,
  ) -> Option<NonNull<Block>> {
    if self.is_empty() {
      return None;
    }

    let fits = |block: &NonNull<Block>| unsafe { (*block.as_ptr()).size >= size };

    let Some(cursor) = self.cursor else {
      return self.iter().find(fits);
    };

    let tail = Iter {
      current: Some(cursor),
      _list: PhantomData,
    };

    tail.chain(self.iter().take_while(|&block| block != cursor)).find(fits)
  }
}

impl Default for FreeList {
  fn default() -> Self {
    Self::new()
  }
}

pub struct Iter<'a> {
  current: Option<NonNull<Block>>,
  _list: PhantomData<&'a FreeList>,
}

impl Iterator for Iter<'_> {
  type Item = NonNull<Block>;

  fn next(&mut self) -> Option<Self::Item> {
    let block = self.current?;
    self.current = unsafe { (*block.as_ptr()).next };
    Some(block)
  }
}
