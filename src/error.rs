/// Ways an allocation request can fail.
///
/// Failures never disturb existing allocations or the free list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AllocError {
  #[error("requested size {size} overflows the address space")]
  SizeOverflow { size: usize },

  #[error("{count} elements of {size} bytes overflow the address space")]
  ArrayOverflow { count: usize, size: usize },

  #[error("arena could not grow by {requested} bytes")]
  OutOfMemory { requested: usize },
}
