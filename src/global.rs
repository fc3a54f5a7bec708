use std::{
  alloc::{GlobalAlloc, Layout},
  ptr::{self, NonNull},
};

use spin::Mutex;

use crate::{
  align::ALIGNMENT,
  allocator::{Allocator, Stats},
  arena::{ArenaGrower, Sbrk},
};

/// An [`Allocator`] behind a spin lock, usable as `#[global_allocator]`.
///
/// Every call takes the one lock for its whole duration, so the free list,
/// the cursor and the arena boundary are only ever touched by one thread.
///
/// ```rust,ignore
/// use nextfit::LockedAllocator;
///
/// #[global_allocator]
/// static GLOBAL: LockedAllocator = LockedAllocator::new();
/// ```
///
/// Layouts asking for more than [`ALIGNMENT`] bytes of alignment are
/// refused with a null pointer.
pub struct LockedAllocator<G: ArenaGrower = Sbrk> {
  inner: Mutex<Allocator<G>>,
}

impl LockedAllocator {
  pub const fn new() -> Self {
    Self::with_grower(Sbrk)
  }
}

impl Default for LockedAllocator {
  fn default() -> Self {
    Self::new()
  }
}

impl<G: ArenaGrower> LockedAllocator<G> {
  pub const fn with_grower(grower: G) -> Self {
    Self {
      inner: Mutex::new(Allocator::with_grower(grower)),
    }
  }

  pub fn stats(&self) -> Stats {
    self.inner.lock().stats()
  }
}

fn supported(layout: Layout) -> bool {
  layout.align() <= ALIGNMENT
}

unsafe impl<G: ArenaGrower + Send> GlobalAlloc for LockedAllocator<G> {
  unsafe fn alloc(
    &self,
    layout: Layout,
  ) -> *mut u8 {
    if !supported(layout) {
      return ptr::null_mut();
    }

    self
      .inner
      .lock()
      .allocate(layout.size())
      .map_or(ptr::null_mut(), NonNull::as_ptr)
  }

  unsafe fn alloc_zeroed(
    &self,
    layout: Layout,
  ) -> *mut u8 {
    if !supported(layout) {
      return ptr::null_mut();
    }

    self
      .inner
      .lock()
      .zero_allocate(1, layout.size())
      .map_or(ptr::null_mut(), NonNull::as_ptr)
  }

  unsafe fn dealloc(
    &self,
    ptr: *mut u8,
    _layout: Layout,
  ) {
    unsafe { self.inner.lock().release(ptr) }
  }

  unsafe fn realloc(
    &self,
    ptr: *mut u8,
    layout: Layout,
    new_size: usize,
  ) -> *mut u8 {
    if !supported(layout) {
      return ptr::null_mut();
    }

    unsafe { self.inner.lock().resize(ptr, new_size) }.map_or(ptr::null_mut(), NonNull::as_ptr)
  }
}
