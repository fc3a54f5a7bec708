/// Boundary every payload handed out by the allocator is aligned to.
///
/// Sixteen bytes satisfies the strictest fundamental alignment on the
/// platforms we care about (`u128`, `f64x2`, `max_align_t`).
pub const ALIGNMENT: usize = 16;

/// Rounds `$value` up to the allocator's [`ALIGNMENT`](crate::align::ALIGNMENT).
///
/// Overflows for values within `ALIGNMENT - 1` of `usize::MAX`; use
/// [`checked_align`] when the input comes from a caller.
///
/// # Examples
///
/// ```rust
/// use nextfit::align;
///
/// assert_eq!(align!(0), 0);
/// assert_eq!(align!(1), 16);
/// assert_eq!(align!(13), 16);
/// assert_eq!(align!(17), 32);
/// ```
#[macro_export]
macro_rules! align {
  ($value:expr) => {
    $crate::align_to!($value, $crate::align::ALIGNMENT)
  };
}

/// Rounds `$value` up to the next multiple of `$align`, which must be a
/// power of two.
///
/// # Examples
///
/// ```rust
/// use nextfit::align_to;
///
/// assert_eq!(align_to!(0x1001, 0x1000), 0x2000);
/// assert_eq!(align_to!(24, 8), 24);
/// ```
#[macro_export]
macro_rules! align_to {
  ($value:expr, $align:expr) => {
    ($value + $align - 1) & !($align - 1)
  };
}

/// Overflow-checked [`align!`].
pub fn checked_align(value: usize) -> Option<usize> {
  value
    .checked_add(ALIGNMENT - 1)
    .map(|padded| padded & !(ALIGNMENT - 1))
}
