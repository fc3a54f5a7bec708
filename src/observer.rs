use std::ptr::NonNull;

use log::{debug, warn};

use crate::error::AllocError;

/// Something worth reporting that happened inside the allocator.
///
/// Addresses are block header addresses unless stated otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
  /// A listed block satisfied a request.
  Reused { block: NonNull<u8>, size: usize },
  /// A listed block was trimmed to `size`, leaving `remainder` payload bytes free.
  Split {
    block: NonNull<u8>,
    size: usize,
    remainder: usize,
  },
  /// The arena grew by `increment` bytes to host a new block.
  Extended {
    block: NonNull<u8>,
    size: usize,
    increment: usize,
  },
  /// Address-adjacent free blocks were merged into `block`.
  Coalesced { block: NonNull<u8>, size: usize },
  /// A client returned the payload at `payload`.
  Released { payload: NonNull<u8>, size: usize },
  /// A request failed; nothing was modified.
  Failed { error: AllocError },
}

/// Receives allocator events.
///
/// Observers run inline on the allocation path and must not allocate from
/// the allocator they observe.
pub trait AllocObserver {
  fn observe(
    &mut self,
    event: &Event,
  );
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl AllocObserver for NoopObserver {
  #[inline]
  fn observe(
    &mut self,
    _event: &Event,
  ) {
  }
}

/// Forwards events to the `log` facade under the `nextfit` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl AllocObserver for LogObserver {
  fn observe(
    &mut self,
    event: &Event,
  ) {
    match *event {
      Event::Reused { block, size } => {
        debug!(target: "nextfit", "reused block {block:?} ({size} bytes)");
      }
      Event::Split {
        block,
        size,
        remainder,
      } => {
        debug!(target: "nextfit", "split block {block:?} into {size} + {remainder} bytes");
      }
      Event::Extended {
        block,
        size,
        increment,
      } => {
        debug!(
          target: "nextfit",
          "extended arena by {increment} bytes for block {block:?} ({size} bytes)"
        );
      }
      Event::Coalesced { block, size } => {
        debug!(target: "nextfit", "coalesced into block {block:?} ({size} bytes)");
      }
      Event::Released { payload, size } => {
        debug!(target: "nextfit", "released {payload:?} ({size} bytes)");
      }
      Event::Failed { error } => {
        warn!(target: "nextfit", "allocation failed: {error}");
      }
    }
  }
}

impl<O: AllocObserver + ?Sized> AllocObserver for &mut O {
  fn observe(
    &mut self,
    event: &Event,
  ) {
    (**self).observe(event)
  }
}
