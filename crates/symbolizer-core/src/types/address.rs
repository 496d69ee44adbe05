//! Virtual address type.

use std::fmt;

/// A virtual address inside the dumped process
///
/// This wrapper around `u64` keeps addresses from being mixed up with sizes,
/// offsets, and RVAs, which are all plain `u64` values in the engine.
///
/// An `Address` refers to the address space of the process *at capture time*.
/// The dump is a frozen snapshot, so there is no relationship to any live
/// process.
///
/// ## Example
///
/// ```rust
/// use symbolizer_core::types::Address;
///
/// let addr = Address::from(0x7ff6_1000_0000);
/// assert_eq!(addr.checked_add(0x10), Some(Address::new(0x7ff6_1000_0010)));
/// assert_eq!(addr.to_string(), "0x00007ff610000000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(u64);

impl Address
{
    /// The null address (0x0)
    ///
    /// Rarely maps to a symbol, but it is a valid value: an engine may
    /// legitimately resolve a name to it.
    pub const ZERO: Self = Address(0);

    /// Create a new address from a `u64` value (usable in const contexts).
    pub const fn new(value: u64) -> Self
    {
        Address(value)
    }

    /// Raw `u64` value of this address.
    pub const fn value(self) -> u64
    {
        self.0
    }

    /// Add an offset, returning `None` on overflow.
    pub fn checked_add(self, offset: u64) -> Option<Self>
    {
        self.0.checked_add(offset).map(Address)
    }

    /// Subtract an offset, returning `None` on underflow.
    pub fn checked_sub(self, offset: u64) -> Option<Self>
    {
        self.0.checked_sub(offset).map(Address)
    }

    /// Distance from `base` up to this address, or `None` if `base` is above it.
    ///
    /// ```rust
    /// use symbolizer_core::types::Address;
    ///
    /// let base = Address::new(0x1000);
    /// assert_eq!(Address::new(0x1234).offset_from(base), Some(0x234));
    /// assert_eq!(Address::new(0x0fff).offset_from(base), None);
    /// ```
    pub fn offset_from(self, base: Address) -> Option<u64>
    {
        self.0.checked_sub(base.0)
    }
}

impl From<u64> for Address
{
    fn from(value: u64) -> Self
    {
        Address(value)
    }
}

impl From<Address> for u64
{
    fn from(address: Address) -> Self
    {
        address.0
    }
}

impl fmt::Display for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "0x{:016x}", self.0)
    }
}

impl fmt::LowerHex for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        fmt::LowerHex::fmt(&self.0, f)
    }
}
