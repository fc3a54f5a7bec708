//! # nextfit - A Free-List Memory Allocator Library
//!
//! This crate provides a **free-list allocator** with next-fit placement,
//! block splitting and eager coalescing, backed by a single arena that grows
//! through the `sbrk` system call.
//!
//! ## Overview
//!
//! ```text
//!   Free-List Allocator Concept:
//!
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                         HEAP MEMORY                                  │
//!   │                                                                      │
//!   │   ┌─────┬─────┬─────┬─────┬─────┬────────────────────────────────┐   │
//!   │   │ A1  │free │ A3  │free │ A5  │          (not yet mapped)      │   │
//!   │   └─────┴─────┴─────┴─────┴─────┴────────────────────────────────┘   │
//!   │            ▲           ▲        ▲                                    │
//!   │            │           │        │                                    │
//!   │            └─ free list┘     Program                                 │
//!   │               (reused)        Break                                  │
//!   │                                                                      │
//!   └──────────────────────────────────────────────────────────────────────┘
//!
//!   Released blocks are listed and reused before the arena grows.
//!   Neighbouring free blocks are always merged into one.
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   nextfit
//!   ├── align      - Alignment constant and macros (align!, align_to!)
//!   ├── block      - Block header and header/payload arithmetic (internal)
//!   ├── free_list  - Free list, neighbour lookup and next-fit search
//!   ├── coalesce   - Merging of address-adjacent free blocks (internal)
//!   ├── split      - Carving a free block into used part and remainder (internal)
//!   ├── arena      - ArenaGrower trait, Sbrk and FixedArena
//!   ├── allocator  - Allocator: allocate, zero_allocate, resize, release
//!   ├── observer   - Event hooks (NoopObserver, LogObserver)
//!   ├── global     - LockedAllocator, a GlobalAlloc adapter
//!   └── error      - AllocError
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use nextfit::{Allocator, FixedArena};
//!
//! let arena = FixedArena::with_capacity(4096).unwrap();
//! let mut allocator = Allocator::with_grower(arena);
//!
//! let ptr = allocator.allocate(8).unwrap().cast::<u64>();
//! unsafe {
//!   ptr.write(42);
//!   assert_eq!(ptr.read(), 42);
//!
//!   allocator.release(ptr.as_ptr().cast());
//! }
//!
//! // The released block comes back without growing the arena.
//! assert_eq!(allocator.allocate(8).unwrap(), ptr.cast());
//! assert_eq!(allocator.grower().growths(), 1);
//! ```
//!
//! ## How It Works
//!
//! Every allocation is a block: a header followed by the payload handed to
//! the caller.
//!
//! ```text
//!   Single Allocation:
//!   ┌───────────────────────┬────────────────────────────────┐
//!   │    Block Header       │         User Data              │
//!   │  ┌─────────────────┐  │                                │
//!   │  │ size: N         │  │  ┌──────────────────────────┐  │
//!   │  │ next: free link │  │  │     N bytes usable       │  │
//!   │  └─────────────────┘  │  └──────────────────────────┘  │
//!   │      16 bytes         │                                │
//!   └───────────────────────┴────────────────────────────────┘
//!                           ▲
//!                           └── Pointer returned to user (16-byte aligned)
//! ```
//!
//! An allocation request is rounded up to 16 bytes and then:
//!
//! 1. the free list is searched **next-fit**, starting where the previous
//!    hit left off and wrapping around once;
//! 2. a hit with room to spare is **split**, the tail staying on the list;
//! 3. a miss **extends** the arena by one block, which is merged with the
//!    previous top block if that one was free.
//!
//! Releasing a block lists it and **coalesces** it with free neighbours,
//! so no two free blocks are ever adjacent.
//!
//! ## Limitations
//!
//! - **Single-threaded core**: `Allocator` takes `&mut self`; share it
//!   through [`LockedAllocator`]
//! - **Never shrinks**: memory is not returned to the OS
//! - **Linear neighbour lookup**: coalescing scans the whole free list
//! - **16-byte alignment at most**
//! - **Unix-only** `Sbrk` grower (requires `libc`)
//!
//! ## Safety
//!
//! Releasing or resizing a pointer this allocator did not hand out, or
//! releasing it twice, is undefined behaviour and is not detected.

pub mod align;
mod allocator;
mod arena;
mod block;
mod coalesce;
mod error;
mod free_list;
mod global;
mod observer;
mod split;

pub use allocator::{Allocator, FreeBlock, Stats};
pub use arena::{ArenaGrower, FixedArena, Sbrk, print_alloc};
pub use block::HEADER_SIZE;
pub use error::AllocError;
pub use global::LockedAllocator;
pub use observer::{AllocObserver, Event, LogObserver, NoopObserver};
