use std::{io::Read, ptr};

use libc::sbrk;
use nextfit::{AllocObserver, Allocator, Event, Sbrk, print_alloc};

/// Waits until the user presses ENTER.
/// Useful when you want to inspect memory state with tools like `pmap`, `htop`,
/// `gdb`, or just visually track how allocations change the program break.
fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

/// Prints the current program break using `sbrk(0)`.
fn print_program_break(label: &str) {
  println!(
    "[{}] PID = {}, program break (sbrk(0)) = {:?}",
    label,
    std::process::id(),
    unsafe { sbrk(0) },
  );
}

/// Prints every allocator event as it happens.
struct PrintObserver;

impl AllocObserver for PrintObserver {
  fn observe(
    &mut self,
    event: &Event,
  ) {
    println!("    event: {:?}", event);
  }
}

fn print_free_list(allocator: &Allocator<Sbrk, PrintObserver>) {
  println!("    free list:");
  for block in allocator.free_blocks() {
    println!("      {:#x} ({} bytes)", block.addr, block.size);
  }
  println!("    {:?}", allocator.stats());
}

fn main() {
  let mut allocator = Allocator::with_observer(Sbrk, PrintObserver);

  print_program_break("start");
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 1) Three allocations, each carved fresh from the arena.
  // --------------------------------------------------------------------
  let Ok(first) = allocator.allocate(24) else {
    eprintln!("out of memory");
    return;
  };
  print_alloc(24, first.as_ptr());

  let Ok(second) = allocator.allocate(100) else {
    eprintln!("out of memory");
    return;
  };
  print_alloc(100, second.as_ptr());

  let Ok(third) = allocator.allocate(16) else {
    eprintln!("out of memory");
    return;
  };
  print_alloc(16, third.as_ptr());

  unsafe {
    first.cast::<u64>().write(0xDEADBEEF);
    ptr::write_bytes(second.as_ptr(), 0xAB, 100);
  }
  println!("[1] Wrote into first and second block");
  print_free_list(&allocator);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 2) Release the first two. They touch, so they merge into one block.
  // --------------------------------------------------------------------
  unsafe {
    allocator.release(first.as_ptr());
    allocator.release(second.as_ptr());
  }
  println!("\n[2] Released first and second (coalesced)");
  print_free_list(&allocator);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 3) A small request reuses the merged block and splits it.
  // --------------------------------------------------------------------
  let Ok(small) = allocator.allocate(8) else {
    eprintln!("out of memory");
    return;
  };
  println!("\n[3] Allocate 8 bytes (check reuse of freed block)");
  print_alloc(8, small.as_ptr());
  println!(
    "[3] small == first? {}",
    if small == first {
      "Yes, it reused the freed block"
    } else {
      "No, it allocated somewhere else"
    }
  );
  print_free_list(&allocator);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 4) Growing a block moves it and frees the old one.
  // --------------------------------------------------------------------
  let Ok(grown) = (unsafe { allocator.resize(small.as_ptr(), 512) }) else {
    eprintln!("out of memory");
    return;
  };
  println!("\n[4] Resized small block to 512 bytes");
  print_alloc(512, grown.as_ptr());
  print_free_list(&allocator);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 5) A large block to observe heap growth.
  // --------------------------------------------------------------------
  print_program_break("before large alloc");

  let Ok(big) = allocator.zero_allocate(64, 1024) else {
    eprintln!("out of memory");
    return;
  };
  println!("\n[5] Zero-allocate 64 KiB");
  print_alloc(64 * 1024, big.as_ptr());

  print_program_break("after large alloc");
  print_free_list(&allocator);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 6) End of demo. The arena never shrinks; the OS reclaims it at exit.
  // --------------------------------------------------------------------
  unsafe {
    allocator.release(big.as_ptr());
    allocator.release(grown.as_ptr());
    allocator.release(third.as_ptr());
  }
  print_free_list(&allocator);
  println!("\n[6] End of example. Process will exit and the OS will reclaim all memory.");
}
