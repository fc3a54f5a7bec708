use std::ptr::NonNull;

use crate::{block::Block, free_list::FreeList};

impl FreeList {
  /// Merges `block` with whichever free blocks touch it by address.
  ///
  /// ```text
  ///   │ prev (free) │ block (free) │ next (free) │
  ///   └─────────────┴──────────────┴─────────────┘
  ///                 ▼
  ///   │ prev (free, spanning all three ranges)                    │
  /// ```
  ///
  /// A free predecessor absorbs `block`; the survivor then absorbs a free
  /// successor. Absorbed headers are unlinked from the list, so the result
  /// is the only listed block covering the merged range. Returns the
  /// surviving block, or `None` for `None`.
  ///
  /// # Safety
  ///
  /// `block` must be an initialized header that is already listed.
  pub unsafe fn coalesce(
    &mut self,
    block: Option<NonNull<Block>>,
  ) -> Option<NonNull<Block>> {
    let mut block = block?;

    unsafe {
      let predecessor = self.find_predecessor_by_address(block);
      let successor = self.find_successor_by_address(block);

      if let Some(predecessor) = predecessor {
        self.remove(block);
        Block::absorb(predecessor, block);
        block = predecessor;
      }

      if let Some(successor) = successor {
        self.remove(successor);
        Block::absorb(block, successor);
      }
    }

    Some(block)
  }
}
