//! Common definitions used across this library.

/// Type to represent a virtual address in the guest address space.
///
/// All arithmetic on addresses wraps, same as unsigned pointer arithmetic would,
/// so that candidate deltas and derived bases never panic on underflow.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Eq, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Address(u64);
impl Address {
	pub const fn new(address: u64) -> Self {
		Address(address)
	}

	pub const fn get(&self) -> u64 {
		self.0
	}

	pub const fn wrapping_add(&self, rhs: u64) -> Address {
		Address(self.0.wrapping_add(rhs))
	}

	pub const fn wrapping_sub(&self, rhs: u64) -> Address {
		Address(self.0.wrapping_sub(rhs))
	}

	/// Distance from `other` to `self`, wrapping.
	pub const fn delta(&self, other: Address) -> u64 {
		self.0.wrapping_sub(other.0)
	}

	/// Renders the scanned offset as a full kernel-space address by setting `high_bits`.
	pub const fn with_high_bits(&self, high_bits: u64) -> Address {
		Address(self.0 | high_bits)
	}

	/// Rounds down to the start of the `page_size` page containing this address.
	///
	/// `page_size` must be a power of two.
	pub const fn page_floor(&self, page_size: u64) -> Address {
		Address(self.0 & !(page_size - 1))
	}
}
impl std::fmt::Display for Address {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "{:x}", self.get())
	}
}

#[cfg(test)]
mod test {
	use super::Address;

	#[test]
	fn test_address_wrapping_delta() {
		let a = Address::new(0x1000);
		let b = a.wrapping_sub(0x3ead0 - 0xf650);

		assert_eq!(a.delta(b), 0x3ead0 - 0xf650);
		assert!(b.get() > a.get());
	}

	#[test]
	fn test_address_high_bits() {
		let base = Address::new(0xfc0120000);

		assert_eq!(
			base.with_high_bits(0xffffffff00000000).get(),
			0xffffffffc0120000
		);
		assert_eq!(format!("{}", base), "fc0120000");
	}

	#[test]
	fn test_address_page_floor() {
		assert_eq!(
			Address::new(0xfc003eb02).page_floor(0x1000),
			Address::new(0xfc003e000)
		);
		assert_eq!(
			Address::new(0x2000).page_floor(0x1000),
			Address::new(0x2000)
		);
	}
}
