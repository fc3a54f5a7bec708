use std::{alloc::Layout, ptr::NonNull};

use libc::{c_void, intptr_t, sbrk};

use crate::align::ALIGNMENT;

/// Program-break style source of arena memory.
///
/// # Safety
///
/// Implementors must hand out regions that are valid for reads and writes
/// for as long as the grower lives, and successive successful calls to
/// [`ArenaGrower::extend`] must never return overlapping regions.
pub unsafe trait ArenaGrower {
  /// Current end of the arena: where the next extension would start.
  fn boundary(&self) -> usize;

  /// Moves the boundary up by `increment` bytes, returning the previous
  /// boundary, or `None` if the space cannot be granted.
  fn extend(
    &mut self,
    increment: usize,
  ) -> Option<NonNull<u8>>;
}

/// The process program break, moved with `sbrk(2)`.
///
/// Only one `Sbrk` arena should be active per process, and nothing else
/// should move the break while it is.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sbrk;

unsafe impl ArenaGrower for Sbrk {
  fn boundary(&self) -> usize {
    unsafe { sbrk(0) as usize }
  }

  fn extend(
    &mut self,
    increment: usize,
  ) -> Option<NonNull<u8>> {
    let increment = intptr_t::try_from(increment).ok()?;
    let address = unsafe { sbrk(increment) };

    if address == usize::MAX as *mut c_void {
      return None;
    }

    NonNull::new(address.cast::<u8>())
  }
}

/// A region reserved up front and handed out in program-break fashion.
///
/// Useful where `sbrk` is unavailable or must not be shared, and in tests,
/// since it records how often it was asked to grow.
pub struct FixedArena {
  base: NonNull<u8>,
  layout: Layout,
  used: usize,
  growths: usize,
}

impl FixedArena {
  /// Reserves `capacity` bytes (rounded up to the alignment) from the
  /// system allocator. Returns `None` if that reservation fails.
  pub fn with_capacity(capacity: usize) -> Option<Self> {
    let layout = Layout::from_size_align(capacity.max(ALIGNMENT), ALIGNMENT)
      .ok()?
      .pad_to_align();
    let base = NonNull::new(unsafe { std::alloc::alloc(layout) })?;

    Some(Self {
      base,
      layout,
      used: 0,
      growths: 0,
    })
  }

  pub fn base(&self) -> usize {
    self.base.as_ptr() as usize
  }

  pub fn capacity(&self) -> usize {
    self.layout.size()
  }

  /// Bytes handed out so far.
  pub fn used(&self) -> usize {
    self.used
  }

  /// Number of successful extensions.
  pub fn growths(&self) -> usize {
    self.growths
  }
}

unsafe impl ArenaGrower for FixedArena {
  fn boundary(&self) -> usize {
    self.base() + self.used
  }

  fn extend(
    &mut self,
    increment: usize,
  ) -> Option<NonNull<u8>> {
    let used = self.used.checked_add(increment)?;
    if used > self.capacity() {
      return None;
    }

    let previous = unsafe { self.base.add(self.used) };
    self.used = used;
    self.growths += 1;

    Some(previous)
  }
}

impl Drop for FixedArena {
  fn drop(&mut self) {
    unsafe { std::alloc::dealloc(self.base.as_ptr(), self.layout) };
  }
}

// SAFETY: the region is exclusively owned by the arena.
unsafe impl Send for FixedArena {}

/// Prints an allocation together with the current program break.
pub fn print_alloc(
  size: usize,
  addr: *mut u8,
) {
  println!(
    "Allocated {} bytes, address = {:?}, program break = {:?}",
    size,
    addr,
    unsafe { sbrk(0) }
  );
}
