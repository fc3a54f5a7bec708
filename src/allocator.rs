use std::ptr::{self, NonNull};

use crate::{
  align::{ALIGNMENT, checked_align},
  arena::{ArenaGrower, Sbrk},
  block::{Block, HEADER_SIZE},
  error::AllocError,
  free_list::FreeList,
  observer::{AllocObserver, Event, NoopObserver},
  split::split,
};

/// A listed block as seen from outside: header address and payload size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeBlock {
  pub addr: usize,
  pub size: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
  pub free_blocks: usize,
  pub free_bytes: usize,
  pub arena_bytes: usize,
  pub growths: usize,
}

/// Free-list allocator with next-fit placement over a single growable arena.
///
/// ```text
///   arena (grows →)
///   ┌────┬──────┬────┬────────┬────┬────┬────┬──────────┐
///   │ H  │ used │ H  │  free  │ H  │used│ H  │   free   │ ← boundary
///   └────┴──────┴────┴────────┴────┴────┴────┴──────────┘
///                 ▲                        ▲
///   free list:    └──────── next ──────────┘ (insertion order)
/// ```
///
/// The allocator never hands arena memory back; released blocks are listed
/// and merged with free neighbours so no two free blocks ever touch.
pub struct Allocator<G: ArenaGrower = Sbrk, O: AllocObserver = NoopObserver> {
  free_list: FreeList,
  grower: G,
  observer: O,
  arena_bytes: usize,
  growths: usize,
}

impl Allocator {
  /// An allocator on the process program break.
  pub const fn new() -> Self {
    Self::with_grower(Sbrk)
  }
}

impl Default for Allocator {
  fn default() -> Self {
    Self::new()
  }
}

impl<G: ArenaGrower> Allocator<G> {
  pub const fn with_grower(grower: G) -> Self {
    Self::with_observer(grower, NoopObserver)
  }
}

impl<G: ArenaGrower, O: AllocObserver> Allocator<G, O> {
  pub const fn with_observer(
    grower: G,
    observer: O,
  ) -> Self {
    Self {
      free_list: FreeList::new(),
      grower,
      observer,
      arena_bytes: 0,
      growths: 0,
    }
  }

  pub fn grower(&self) -> &G {
    &self.grower
  }

  pub fn observer(&self) -> &O {
    &self.observer
  }

  pub fn observer_mut(&mut self) -> &mut O {
    &mut self.observer
  }

  /// Listed blocks in list order.
  pub fn free_blocks(&self) -> impl Iterator<Item = FreeBlock> + '_ {
    self.free_list.iter().map(|block| FreeBlock {
      addr: block.as_ptr() as usize,
      size: unsafe { (*block.as_ptr()).size },
    })
  }

  pub fn stats(&self) -> Stats {
    Stats {
      free_blocks: self.free_list.len(),
      free_bytes: self.free_blocks().map(|block| block.size).sum(),
      arena_bytes: self.arena_bytes,
      growths: self.growths,
    }
  }

  /// Hands out at least `size` bytes aligned to [`ALIGNMENT`].
  pub fn allocate(
    &mut self,
    size: usize,
  ) -> Result<NonNull<u8>, AllocError> {
    let result = self.allocate_block(size);

    if let Err(error) = result {
      self.observer.observe(&Event::Failed { error });
    }

    result.map(Block::payload)
  }

  fn allocate_block(
    &mut self,
    size: usize,
  ) -> Result<NonNull<Block>, AllocError> {
    let size = checked_align(size).ok_or(AllocError::SizeOverflow { size })?;

    let Some(block) = self.free_list.next_fit(size) else {
      unsafe {
        let block = self.extend(size)?;
        self.trim(block, size);
        self.free_list.remove(block);
        return Ok(block);
      }
    };

    unsafe {
      self.trim(block, size);

      let successor = (*block.as_ptr()).next;
      self.free_list.remove(block);
      self.free_list.set_cursor(successor);

      self.observer.observe(&Event::Reused {
        block: block.cast(),
        size: (*block.as_ptr()).size,
      });
    }

    Ok(block)
  }

  /// Splits a listed block down to `size` when the tail can hold a useful
  /// block of its own. The tail stays listed.
  unsafe fn trim(
    &mut self,
    block: NonNull<Block>,
    size: usize,
  ) {
    unsafe {
      let available = (*block.as_ptr()).size;

      if available > size + HEADER_SIZE && split(block, size).is_some() {
        self.observer.observe(&Event::Split {
          block: block.cast(),
          size,
          remainder: available - size - HEADER_SIZE,
        });
      }
    }
  }

  /// Grows the arena by one block of `size` payload bytes, lists it and
  /// merges it with the previous top block when they touch. Returns the
  /// listed (possibly merged) block.
  unsafe fn extend(
    &mut self,
    size: usize,
  ) -> Result<NonNull<Block>, AllocError> {
    let total = size
      .checked_add(HEADER_SIZE)
      .ok_or(AllocError::SizeOverflow { size })?;

    let boundary = self.grower.boundary();
    let padding = crate::align_to!(boundary, ALIGNMENT) - boundary;
    let mut increment = total
      .checked_add(padding)
      .ok_or(AllocError::SizeOverflow { size })?;

    let region = self
      .grower
      .extend(increment)
      .ok_or(AllocError::OutOfMemory {
        requested: increment,
      })?;
    self.arena_bytes += increment;

    // The break may have moved between reading it and extending it.
    let start = region.as_ptr() as usize;
    let offset = crate::align_to!(start, ALIGNMENT) - start;
    if offset > padding {
      let shortfall = offset - padding;
      let more = self
        .grower
        .extend(shortfall)
        .ok_or(AllocError::OutOfMemory {
          requested: shortfall,
        })?;
      self.arena_bytes += shortfall;

      if more.as_ptr() as usize != start + increment {
        return Err(AllocError::OutOfMemory {
          requested: shortfall,
        });
      }
      increment += shortfall;
    }

    self.growths += 1;

    unsafe {
      let block = Block::init(region.add(offset), size);
      self.observer.observe(&Event::Extended {
        block: block.cast(),
        size,
        increment,
      });

      self.free_list.insert(block);
      let merged = self.merge(block);
      self.free_list.reset_cursor();

      Ok(merged)
    }
  }

  /// Coalesces a freshly listed block and reports any merge.
  unsafe fn merge(
    &mut self,
    block: NonNull<Block>,
  ) -> NonNull<Block> {
    unsafe {
      let before = (*block.as_ptr()).size;
      let merged = self.free_list.coalesce(Some(block)).unwrap_or(block);
      let size = (*merged.as_ptr()).size;

      if merged != block || size != before {
        self.observer.observe(&Event::Coalesced {
          block: merged.cast(),
          size,
        });
      }

      merged
    }
  }

  /// Allocates `count * size` bytes, all zero.
  pub fn zero_allocate(
    &mut self,
    count: usize,
    size: usize,
  ) -> Result<NonNull<u8>, AllocError> {
    let Some(total) = count.checked_mul(size) else {
      let error = AllocError::ArrayOverflow { count, size };
      self.observer.observe(&Event::Failed { error });
      return Err(error);
    };

    let payload = self.allocate(total)?;
    unsafe { ptr::write_bytes(payload.as_ptr(), 0, total) };

    Ok(payload)
  }

  /// Makes `pointer` hold at least `new_size` bytes, moving it if needed.
  ///
  /// A null `pointer` is a plain [`Allocator::allocate`]. A block that is
  /// already large enough is returned as is. On failure the original
  /// allocation is left untouched.
  ///
  /// # Safety
  ///
  /// `pointer` must be null or a live allocation from this allocator.
  pub unsafe fn resize(
    &mut self,
    pointer: *mut u8,
    new_size: usize,
  ) -> Result<NonNull<u8>, AllocError> {
    let Some(payload) = NonNull::new(pointer) else {
      return self.allocate(new_size);
    };

    unsafe {
      let old_size = (*Block::from_payload(payload).as_ptr()).size;
      if old_size >= new_size {
        return Ok(payload);
      }

      let moved = self.allocate(new_size)?;
      ptr::copy_nonoverlapping(payload.as_ptr(), moved.as_ptr(), old_size);
      self.release(payload.as_ptr());

      Ok(moved)
    }
  }

  /// Returns `pointer`'s block to the free list. Null is ignored.
  ///
  /// # Safety
  ///
  /// `pointer` must be null or a live allocation from this allocator.
  /// Releasing twice is undefined behaviour.
  pub unsafe fn release(
    &mut self,
    pointer: *mut u8,
  ) {
    let Some(payload) = NonNull::new(pointer) else {
      return;
    };

    unsafe {
      let block = Block::from_payload(payload);
      self.observer.observe(&Event::Released {
        payload,
        size: (*block.as_ptr()).size,
      });

      self.free_list.insert(block);
      self.merge(block);
    }
  }

  /// Payload bytes usable through `pointer`, at least what was requested.
  ///
  /// # Safety
  ///
  /// `pointer` must be a live allocation from this allocator.
  pub unsafe fn usable_size(
    &self,
    pointer: NonNull<u8>,
  ) -> usize {
    unsafe { (*Block::from_payload(pointer).as_ptr()).size }
  }
}

// SAFETY: the allocator exclusively owns every header reachable from its
// free list; moving it to another thread moves that ownership along.
unsafe impl<G: ArenaGrower + Send, O: AllocObserver + Send> Send for Allocator<G, O> {}
